//! The interactive loop and its static dispatch table.
//!
//! Every command is an entry declaring its name, usage, and the remote
//! capability it needs. The table is built once at startup and filtered
//! against what the connected server actually supports; an unsupported
//! command simply does not exist for that session. Alias expansion runs on
//! the raw line before dispatch; reserved (built-in) names are taken from
//! the unfiltered table so an alias can never shadow a command, supported or
//! not.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use tracing::debug;

use tix_core::alias::{AliasExpander, split_args};
use tix_core::config::Config;
use tix_core::error::ConfigError;
use tix_core::gateway::TicketGateway;

use crate::cmd;
use crate::output;

/// What a command declares about itself.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    /// Remote operation this command needs, if any.
    pub capability: Option<&'static str>,
}

/// Handler signature: session state plus the already-split arguments.
pub type Handler = fn(&mut Session<'_>, &[String]) -> anyhow::Result<()>;

struct Entry {
    spec: CommandSpec,
    handler: Handler,
}

/// Everything a command handler can reach.
pub struct Session<'a> {
    pub gateway: &'a dyn TicketGateway,
    pub editor: Option<String>,
    pub json: bool,
    pub paging: bool,
    pub pager_threshold: usize,
    pub out: &'a mut dyn Write,
    /// Specs of the commands available this session, for `help`.
    pub specs: Vec<CommandSpec>,
    /// The loaded alias table, for `alias`.
    pub aliases: BTreeMap<String, String>,
    /// Set by `quit`.
    pub done: bool,
}

impl Session<'_> {
    /// Print a block, handing tall output to the pager when interactive.
    pub fn emit(&mut self, text: &str) -> std::io::Result<()> {
        output::emit_block(self.out, self.paging, self.pager_threshold, text)
    }
}

fn command_table() -> Vec<Entry> {
    vec![
        Entry {
            spec: CommandSpec {
                name: "query",
                usage: "query <expr>",
                summary: "List tickets matching a query expression",
                capability: Some("ticket.query"),
            },
            handler: cmd::query::run,
        },
        Entry {
            spec: CommandSpec {
                name: "view",
                usage: "view <id>",
                summary: "Show every field of one ticket",
                capability: Some("ticket.get"),
            },
            handler: cmd::view::run,
        },
        Entry {
            spec: CommandSpec {
                name: "edit",
                usage: "edit <id> [field=value ...]",
                summary: "Edit a ticket in your editor, or apply field=value pairs directly",
                capability: Some("ticket.update"),
            },
            handler: cmd::edit::run,
        },
        Entry {
            spec: CommandSpec {
                name: "create",
                usage: "create <summary>",
                summary: "Create a new ticket from an editor template",
                capability: Some("ticket.create"),
            },
            handler: cmd::create::run,
        },
        Entry {
            spec: CommandSpec {
                name: "changelog",
                usage: "changelog <id> [id ...]",
                summary: "Show the change history of one or more tickets",
                capability: Some("ticket.changelog"),
            },
            handler: cmd::changelog::run,
        },
        Entry {
            spec: CommandSpec {
                name: "alias",
                usage: "alias",
                summary: "List the aliases loaded from your config",
                capability: None,
            },
            handler: run_alias,
        },
        Entry {
            spec: CommandSpec {
                name: "help",
                usage: "help [command]",
                summary: "Show available commands",
                capability: None,
            },
            handler: run_help,
        },
        Entry {
            spec: CommandSpec {
                name: "quit",
                usage: "quit",
                summary: "Leave the shell",
                capability: None,
            },
            handler: run_quit,
        },
    ]
}

/// The interactive shell: dispatch table, alias expander, session state.
pub struct Shell<'a> {
    entries: Vec<Entry>,
    expander: AliasExpander,
    session: Session<'a>,
}

impl std::fmt::Debug for Shell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Shell<'a> {
    /// Build the filtered dispatch table and validate the alias config.
    pub fn new(
        config: &Config,
        gateway: &'a dyn TicketGateway,
        editor: Option<String>,
        json: bool,
        paging: bool,
        out: &'a mut dyn Write,
    ) -> Result<Self, ConfigError> {
        let all = command_table();
        let reserved: Vec<&'static str> = all.iter().map(|entry| entry.spec.name).collect();
        config.ensure_aliases_allowed(reserved.iter().copied())?;

        let capabilities = gateway.capabilities();
        let entries: Vec<Entry> = all
            .into_iter()
            .filter(|entry| {
                entry
                    .spec
                    .capability
                    .is_none_or(|name| capabilities.contains(name))
            })
            .collect();
        debug!(commands = entries.len(), "dispatch table built");

        let expander = AliasExpander::new(
            config.aliases.clone(),
            reserved.iter().map(|name| (*name).to_string()),
        );

        let session = Session {
            gateway,
            editor,
            json,
            paging,
            pager_threshold: config.pager_threshold,
            out,
            specs: Vec::new(),
            aliases: config.aliases.clone(),
            done: false,
        };

        let mut shell = Self {
            entries,
            expander,
            session,
        };
        shell.session.specs = shell.entries.iter().map(|entry| entry.spec).collect();
        Ok(shell)
    }

    /// Expand aliases, split, and dispatch one line.
    pub fn run_line(&mut self, raw: &str) -> anyhow::Result<()> {
        let line = self.expander.expand(raw);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        let words = split_args(trimmed);
        let Some((head, args)) = words.split_first() else {
            return Ok(());
        };

        match self.entries.iter().find(|entry| entry.spec.name == head.as_str()) {
            Some(entry) => (entry.handler)(&mut self.session, args),
            None => anyhow::bail!("unknown command '{head}' (try `help`)"),
        }
    }

    /// Read lines until EOF or `quit`, rendering handler errors and
    /// continuing. One command runs to completion before the next is read.
    pub fn repl(&mut self, input: &mut dyn BufRead) -> anyhow::Result<()> {
        loop {
            write!(self.session.out, "tix> ")?;
            self.session.out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(self.session.out)?;
                break;
            }
            if let Err(err) = self.run_line(&line) {
                output::render_error(self.session.json, &output::classify(&err));
            }
            if self.session.done {
                break;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session<'a> {
        &self.session
    }
}

fn run_alias(session: &mut Session<'_>, _args: &[String]) -> anyhow::Result<()> {
    if session.aliases.is_empty() {
        writeln!(session.out, "no aliases configured")?;
        return Ok(());
    }
    let width = session
        .aliases
        .keys()
        .map(String::len)
        .max()
        .unwrap_or_default();
    for (name, template) in &session.aliases {
        writeln!(session.out, "{name:width$} = {template}")?;
    }
    Ok(())
}

fn run_help(session: &mut Session<'_>, args: &[String]) -> anyhow::Result<()> {
    if let Some(name) = args.first() {
        let Some(spec) = session.specs.iter().find(|spec| spec.name == name.as_str()) else {
            anyhow::bail!("unknown command '{name}'");
        };
        writeln!(session.out, "{}", spec.usage)?;
        writeln!(session.out, "  {}", spec.summary)?;
        return Ok(());
    }

    writeln!(session.out, "commands:")?;
    let width = session
        .specs
        .iter()
        .map(|spec| spec.name.len())
        .max()
        .unwrap_or_default();
    for spec in &session.specs {
        writeln!(session.out, "  {:width$}  {}", spec.name, spec.summary)?;
    }
    writeln!(session.out, "type `help <command>` for usage")?;
    Ok(())
}

fn run_quit(session: &mut Session<'_>, _args: &[String]) -> anyhow::Result<()> {
    session.done = true;
    writeln!(session.out, "bye")?;
    Ok(())
}
