use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::Write;

/// Write the completion script for `shell` to `out`
pub fn execute(shell: Shell, cmd: &mut Command, out: &mut dyn Write) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_names_binary() {
        let mut cmd = Command::new("logstat").subcommand(Command::new("analyze"));
        let mut buf = Vec::new();
        execute(Shell::Bash, &mut cmd, &mut buf).unwrap();

        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("_logstat()"));
        assert!(script.contains("analyze"));
    }
}
