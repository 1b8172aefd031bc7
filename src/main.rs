//! Line-oriented shell over the caspier kernel.

mod logging;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use caspier::kernel::services::adapters::{self, AsyncRuntime};
use caspier::kernel::services::{KernelMessage, KernelServiceHost};
use caspier::kernel::{Action, AppState, Effect, Store};
use caspier::models::{Node, NodeId, NodeKind};

const RESULT_TIMEOUT: Duration = Duration::from_secs(5);

const HELP: &str = "\
tree                          show the workspace tree
new file|folder <parent> <n>  create a node under folder <parent>
rename <id> <name>            rename a node
rm <id>                       delete a node and its subtree
open <id> | close <id>        open or close a tab
edit <text>                   replace the active buffer (\\n for newlines)
cat                           print the active buffer
undo | redo
ws new <name> | ws rename <from> <to> | ws switch <name> | ws list
export                        archive the workspace as zip
stage <id> | unstage <id> | commit <message> | push
compile | problems | output
connect                       connect the wallet
deploy [name=value ...]       deploy the last build
chat <text>                   ask the assistant (@file to attach files)
status | help | quit";

struct Shell {
    store: Store,
    host: KernelServiceHost,
    last_line: u64,
    last_message: usize,
    in_flight: usize,
}

impl Shell {
    fn dispatch(&mut self, action: Action) {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            if !matches!(effect, Effect::SaveSettings(_)) {
                self.in_flight += 1;
            }
            self.host.run_effect(effect);
        }
    }

    /// Feeds completed service work back into the store until nothing is outstanding.
    fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.host.recv_timeout(RESULT_TIMEOUT) {
                Ok(KernelMessage::Action(action)) => {
                    self.in_flight -= 1;
                    self.dispatch(action);
                }
                Err(err) => {
                    tracing::warn!(outstanding = self.in_flight, error = %err, "service results timed out");
                    self.in_flight = 0;
                }
            }
        }
    }

    fn flush(&mut self, out: &mut impl Write) -> io::Result<()> {
        let state = self.store.state();
        for line in state.terminal.since(self.last_line) {
            writeln!(out, "{}{}", line.kind.prefix(), line.content)?;
            self.last_line = line.id;
        }
        for message in state.chat.messages().iter().skip(self.last_message) {
            writeln!(out, "[{:?}] {}", message.role, message.text)?;
        }
        self.last_message = state.chat.messages().len();
        out.flush()
    }

    fn run(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let action = match (command, args.as_slice()) {
            ("", _) => None,
            ("quit" | "exit", _) => return Ok(false),
            ("help", _) => {
                writeln!(out, "{}", HELP)?;
                None
            }
            ("tree", _) => {
                self.print_tree(out)?;
                None
            }
            ("cat", _) => {
                writeln!(out, "{}", self.store.state().editor.buffer())?;
                None
            }
            ("status", _) => {
                let status = self.store.state().status();
                writeln!(
                    out,
                    "workspace: {}  branch: {}  problems: {}  language: {}  undo: {}  redo: {}",
                    status.workspace,
                    status.branch,
                    status.problems,
                    status.language.as_deref().unwrap_or("-"),
                    status.can_undo,
                    status.can_redo
                )?;
                None
            }
            ("problems", _) => {
                for item in self.store.state().problems.items() {
                    writeln!(out, "{} {}: {}", item.severity.label(), item.file, item.message)?;
                }
                None
            }
            ("output", _) => {
                for line in self.store.state().terminal.output() {
                    writeln!(out, "{}", line)?;
                }
                None
            }
            ("new", [kind, parent, name, ..]) => {
                let kind = match *kind {
                    "file" => NodeKind::File,
                    "folder" => NodeKind::Folder,
                    _ => return usage(out, "new file|folder <parent> <name>"),
                };
                Some(Action::CreateNode {
                    parent: NodeId::from(*parent),
                    kind,
                    name: name.to_string(),
                })
            }
            ("rename", [id, name, ..]) => Some(Action::RenameNode {
                id: NodeId::from(*id),
                name: name.to_string(),
            }),
            ("rm", [id]) => Some(Action::DeleteNode {
                id: NodeId::from(*id),
            }),
            ("open", [id]) => Some(Action::OpenFile {
                id: NodeId::from(*id),
            }),
            ("close", [id]) => Some(Action::CloseTab {
                id: NodeId::from(*id),
            }),
            ("edit", _) => Some(Action::EditActive {
                content: rest.replace("\\n", "\n"),
            }),
            ("undo", _) => Some(Action::Undo),
            ("redo", _) => Some(Action::Redo),
            ("ws", ["new", name]) => Some(Action::CreateWorkspace {
                name: name.to_string(),
            }),
            ("ws", ["rename", from, to]) => Some(Action::RenameWorkspace {
                from: from.to_string(),
                to: to.to_string(),
            }),
            ("ws", ["switch", name]) => Some(Action::SwitchWorkspace {
                name: name.to_string(),
            }),
            ("ws", ["list"]) => {
                let workspaces = &self.store.state().workspaces;
                for name in workspaces.names() {
                    let marker = if name == workspaces.active() { '*' } else { ' ' };
                    writeln!(out, "{} {}", marker, name)?;
                }
                None
            }
            ("export", _) => Some(Action::ExportWorkspace),
            ("stage", [id]) => Some(Action::GitStage {
                id: NodeId::from(*id),
            }),
            ("unstage", [id]) => Some(Action::GitUnstage {
                id: NodeId::from(*id),
            }),
            ("commit", _) => Some(Action::GitCommit {
                message: rest.to_string(),
            }),
            ("push", _) => Some(Action::GitPush),
            ("compile", _) => Some(Action::Compile),
            ("connect", _) => Some(Action::ConnectWallet),
            ("deploy", _) => {
                let mut pairs = Vec::with_capacity(args.len());
                for arg in &args {
                    let Some((name, value)) = arg.split_once('=') else {
                        return usage(out, "deploy [name=value ...]");
                    };
                    pairs.push((name.to_string(), value.to_string()));
                }
                Some(Action::Deploy {
                    args: pairs,
                    payment_amount: None,
                })
            }
            ("chat", _) => Some(Action::ChatSend {
                text: rest.to_string(),
            }),
            _ => return usage(out, "unknown command, try `help`"),
        };

        if let Some(action) = action {
            self.dispatch(action);
            self.settle();
        }
        self.flush(out)?;
        Ok(true)
    }

    fn print_tree(&self, out: &mut impl Write) -> io::Result<()> {
        let state = self.store.state();
        for node in state.current_tree().iter() {
            self.print_node(node, 0, out)?;
        }
        Ok(())
    }

    fn print_node(&self, node: &Node, depth: usize, out: &mut impl Write) -> io::Result<()> {
        let state = self.store.state();
        let marker = state
            .git
            .status(&node.id)
            .map(|status| status.marker())
            .unwrap_or(' ');
        let active = if state.editor.active() == Some(&node.id) {
            "*"
        } else {
            ""
        };
        let slash = if node.is_folder() { "/" } else { "" };
        writeln!(
            out,
            "{} {}{}{}{}  ({})",
            marker,
            "  ".repeat(depth),
            node.name,
            slash,
            active,
            node.id.as_str()
        )?;
        for child in node.children().unwrap_or_default() {
            self.print_node(child, depth + 1, out)?;
        }
        Ok(())
    }
}

fn usage(out: &mut impl Write, text: &str) -> io::Result<bool> {
    writeln!(out, "usage: {}", text)?;
    Ok(true)
}

fn main() -> io::Result<()> {
    let _logging = logging::init();

    let settings_path = match adapters::ensure_settings_file() {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(error = %e, "settings file unavailable, using defaults");
            None
        }
    };
    let settings = settings_path
        .as_deref()
        .and_then(adapters::load_settings_from)
        .unwrap_or_default();

    let export_dir = adapters::ensure_export_dir()
        .unwrap_or_else(|_| std::env::temp_dir().join("caspier").join("exports"));
    let runtime = Arc::new(AsyncRuntime::new()?);
    let mut host = KernelServiceHost::new(runtime, adapters::simulated_ports(), export_dir);
    if let Some(path) = settings_path {
        host = host.with_settings_path(path);
    }

    let mut shell = Shell {
        store: Store::new(AppState::new(settings)),
        host,
        last_line: 0,
        last_message: 0,
        in_flight: 0,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.flush(&mut stdout)?;
    for line in stdin.lock().lines() {
        let line = line?;
        if !shell.run(&line, &mut stdout)? {
            break;
        }
    }
    tracing::info!("shell exiting");
    Ok(())
}
