//! Command table and input dispatch.
//!
//! Dispatch is a pure function from an input line to an [`Invocation`]; all
//! side effects happen in [`super::Repl`].

/// REPL commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    CreateAccount,
    UsePrevious,
    Info,
    Status,
    Transfer,
    StartMining,
    Txs,
    Coinbase,
    Sign,
    TextSign,
    Help,
    Quit,
}

/// Entry in the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub command: Command,
    pub text: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: Command::CreateAccount,
        text: "create-account",
        description: "Create a new account (key pair) and set as current",
    },
    CommandSpec {
        command: Command::UsePrevious,
        text: "use-previous",
        description: "Set one of the previously created accounts as current",
    },
    CommandSpec {
        command: Command::Info,
        text: "info",
        description: "Display the current account info",
    },
    CommandSpec {
        command: Command::Status,
        text: "status",
        description: "Display the node status",
    },
    CommandSpec {
        command: Command::Transfer,
        text: "transfer",
        description: "Transfer coins from the current account to another address",
    },
    CommandSpec {
        command: Command::StartMining,
        text: "start-mining",
        description: "Start building a mining commitment on the node, rewarding the current account",
    },
    CommandSpec {
        command: Command::Txs,
        text: "txs",
        description: "List transactions of the current account",
    },
    CommandSpec {
        command: Command::Coinbase,
        text: "coinbase",
        description: "Send the node's rewards to the current account",
    },
    CommandSpec {
        command: Command::Sign,
        text: "sign",
        description: "Sign a hex message with the current account private key",
    },
    CommandSpec {
        command: Command::TextSign,
        text: "textsign",
        description: "Sign a text message with the current account private key",
    },
    CommandSpec {
        command: Command::Help,
        text: "help",
        description: "List available commands",
    },
    CommandSpec {
        command: Command::Quit,
        text: "quit",
        description: "Quit the CLI",
    },
];

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    /// Everything after the command word, trimmed
    pub args: String,
}

impl Invocation {
    /// Arguments, or `None` when the user typed only the command.
    pub fn arg(&self) -> Option<&str> {
        if self.args.is_empty() {
            None
        } else {
            Some(&self.args)
        }
    }
}

/// Map an input line to a command by its first word.
pub fn dispatch(input: &str) -> Option<Invocation> {
    let input = input.trim();
    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };

    let command = match word {
        "exit" => Command::Quit,
        _ => COMMANDS.iter().find(|spec| spec.text == word)?.command,
    };

    Some(Invocation {
        command,
        args: rest.to_string(),
    })
}

/// Commands whose name starts with `prefix`.
pub fn suggestions(prefix: &str) -> Vec<&'static CommandSpec> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Vec::new();
    }
    COMMANDS
        .iter()
        .filter(|spec| spec.text.starts_with(prefix))
        .collect()
}
