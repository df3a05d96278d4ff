use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `dcal completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the completion script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to stdout.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    generate(shell, command, "dcal", &mut out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn bash_script_names_the_binary() {
        let mut command = crate::Cli::command();
        let mut out = Vec::new();
        generate(Shell::Bash, &mut command, "dcal", &mut out);
        let script = String::from_utf8(out).expect("utf8");
        assert!(script.contains("dcal"));
        assert!(script.contains("grid"));
    }
}
