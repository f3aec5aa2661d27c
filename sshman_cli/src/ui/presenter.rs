use std::io::{self, Write};

use crossterm::style::Stylize;
use log::debug;
use sshman_core::exec::CommandRunner;
use sshman_core::model::ConnectionSet;

use crate::ui::prompt;

const HEADERS: [&str; 5] = ["No", "Project", "Type", "SSH Command", "Password"];

/// Render the set as a numbered table, let the user pick one row, confirm,
/// and run the stored command. Every invalid input or interrupt is reported
/// and ends the interaction; nothing re-prompts.
pub fn render_and_select<R: CommandRunner>(set: &ConnectionSet, runner: &R) -> io::Result<()> {
    interact(set, runner, prompt::read_line)
}

/// The full selection flow with the line source injected, so tests can
/// script the prompts.
fn interact<R, P>(set: &ConnectionSet, runner: &R, mut ask: P) -> io::Result<()>
where
    R: CommandRunner,
    P: FnMut(&str) -> io::Result<Option<String>>,
{
    if set.is_empty() {
        println!("{}", "No SSH connections available.".yellow());
        return Ok(());
    }

    let mut stdout = io::stdout();
    render_table(set, &mut stdout)?;
    println!();

    let index_prompt = format!(
        "Enter the {} of the connection to run the SSH command: ",
        "number".cyan()
    );
    let input = match ask(&index_prompt)? {
        Some(input) => input,
        None => {
            println!("{}", "Operation canceled...".red());
            return Ok(());
        }
    };

    let record = match parse_selection(&input, set.len()).and_then(|i| set.get_index(i - 1)) {
        Some(record) => record,
        None => {
            println!("{}", "Invalid index. Please enter a valid number.".red());
            return Ok(());
        }
    };

    let confirm_prompt = format!(
        "Are you sure you want to run the command for {}? Press Enter to confirm or Ctrl+C to cancel: ",
        record.key().yellow()
    );
    match ask(&confirm_prompt)? {
        // only a bare Enter confirms
        Some(ref answer) if answer.is_empty() => {
            println!("{}", "Command executing...".green());
            match runner.run(&record.ssh_command) {
                Ok(status) => debug!("Command exited with {status}"),
                Err(e) => println!("{}", format!("Error: {e}").red()),
            }
        }
        Some(_) => println!("{}", "Command execution canceled.".red()),
        None => println!("{}", "Operation canceled...".red()),
    }
    Ok(())
}

/// 1-based table selection: must parse as an integer and land in the table.
fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let index: usize = input.trim().parse().ok()?;
    (1..=len).contains(&index).then_some(index)
}

/// Write the connection table, columns sized to their widest cell. The SSH
/// command column is highlighted; passwords are shown in plaintext, exactly
/// as stored.
fn render_table<W: Write>(set: &ConnectionSet, w: &mut W) -> io::Result<()> {
    let mut widths = HEADERS.map(str::len);
    for (i, (_, record)) in set.iter().enumerate() {
        widths[0] = widths[0].max((i + 1).to_string().len());
        widths[1] = widths[1].max(record.project.len());
        widths[2] = widths[2].max(record.conn_type.len());
        widths[3] = widths[3].max(record.ssh_command.len());
        widths[4] = widths[4].max(record.password.len());
    }

    writeln!(
        w,
        "{:<w0$}  {:<w1$}  {:<w2$}  {:<w3$}  {:<w4$}",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        HEADERS[3],
        HEADERS[4],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
        w4 = widths[4],
    )?;
    writeln!(w, "{}", "─".repeat(widths.iter().sum::<usize>() + 8))?;

    for (i, (_, record)) in set.iter().enumerate() {
        // pad before styling so the escape codes don't skew the column
        let command = format!("{:<width$}", record.ssh_command, width = widths[3]);
        writeln!(
            w,
            "{:<w0$}  {:<w1$}  {:<w2$}  {}  {:<w4$}",
            i + 1,
            record.project,
            record.conn_type,
            command.cyan(),
            record.password,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w4 = widths[4],
        )?;
    }
    Ok(())
}
