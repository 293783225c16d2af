//! Shell completion generation
//!
//! Produces completion scripts for the `cloud` command tree so the same
//! commands complete outside the interactive shell. Bash additionally gets a
//! hook that asks `cliprompt complete` for dynamic values.

use std::io::Write;

use clap_complete::{Shell, generate};

use crate::commands;
use crate::error::{ConfigError, PromptError, Result};

/// Write the completion script for `shell_name` to `out`
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish, powershell, elvish)
/// * `bin_name` - Name the script registers completion for
/// * `out` - Destination of the script
pub fn write_completion(shell_name: &str, bin_name: &str, out: &mut dyn Write) -> Result<()> {
    let shell = parse_shell(shell_name)?;

    // generate() sets the binary name on the command
    let mut cmd = commands::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, bin_name, &mut buffer);
    out.write_all(&buffer)?;

    if shell == Shell::Bash {
        write!(out, "{}", bash_dynamic_hook(bin_name))?;
    }
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    shell_name
        .to_lowercase()
        .parse::<Shell>()
        .map_err(|_| PromptError::Config(ConfigError::UnsupportedShell(shell_name.to_string())))
}

/// Bash wrapper falling back to `cliprompt complete` when clap's script has nothing
fn bash_dynamic_hook(bin_name: &str) -> String {
    let func = bin_name.replace('-', "__");
    format!(
        r#"
# Dynamic values (cluster IDs, topics, ...) from the completion engine
_{func}_dynamic() {{
    local line="${{COMP_LINE:0:$COMP_POINT}}"
    cliprompt complete --format plain --settle -- "$line" 2>/dev/null
}}

_{func}_enhanced() {{
    _{func} "$@"
    if [ ${{#COMPREPLY[@]}} -eq 0 ]; then
        local cur="${{COMP_WORDS[COMP_CWORD]}}"
        COMPREPLY=($(compgen -W "$(_{func}_dynamic)" -- "$cur"))
    fi
}}

complete -F _{func}_enhanced -o bashdefault -o default {bin_name}
"#
    )
}
