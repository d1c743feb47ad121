//! Interactive command loop.
//!
//! Reads commands from any [`BufRead`], writes to any [`Write`] and drives a
//! [`Wallet`]. Wallet failures are reported to the user and logged; only I/O
//! errors on the streams themselves end the session.

pub mod command;
pub mod prompt;

use std::io::{self, BufRead, Write};

use tracing::{debug, error};
use zeroize::Zeroizing;

pub use command::{dispatch, suggestions, Command, CommandSpec, Invocation, COMMANDS};
pub use prompt::Prompter;

use crate::accounts::AccountInfo;
use crate::address::Address;
use crate::client::Transport;
use crate::error::{WalletError, WalletResult};
use crate::transaction::{build_unsigned, parse_amount, SIGNATURE_LENGTH};
use crate::wallet::Wallet;

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<T: Transport, R, W> {
    wallet: Wallet<T>,
    prompt: Prompter<R, W>,
}

impl<T, R, W> Repl<T, R, W>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    pub fn new(wallet: Wallet<T>, input: R, output: W) -> Self {
        Self {
            wallet,
            prompt: Prompter::new(input, output),
        }
    }

    pub fn wallet(&self) -> &Wallet<T> {
        &self.wallet
    }

    pub fn into_inner(self) -> (Wallet<T>, W) {
        let (_, output) = self.prompt.into_inner();
        (self.wallet, output)
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        let url = self.wallet.node_url().to_string();
        self.prompt.say("Welcome to the node wallet CLI")?;
        self.prompt.say(format!("Connected to node at {}", url))?;
        self.prompt.say("Type `help` to list available commands")
    }

    /// Run until `quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            let Some(line) = self.prompt.read_line("")? else {
                debug!("End of input, leaving");
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            let flow = match dispatch(&line) {
                Some(invocation) => self.execute(invocation).await?,
                None => {
                    self.unknown(&line)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                return self.prompt.say("bye");
            }
        }
    }

    pub async fn execute(&mut self, invocation: Invocation) -> io::Result<Flow> {
        debug!("Executing {:?}", invocation.command);
        let arg = invocation.arg();
        match invocation.command {
            Command::CreateAccount => self.create_account(arg)?,
            Command::UsePrevious => self.choose_account(arg)?,
            Command::Info => self.account_info().await?,
            Command::Status => self.node_status().await?,
            Command::Transfer => self.transfer().await?,
            Command::StartMining => self.start_mining().await?,
            Command::Txs => self.list_txs().await?,
            Command::Coinbase => self.set_coinbase().await?,
            Command::Sign => self.sign_hex(arg)?,
            Command::TextSign => self.sign_text(arg)?,
            Command::Help => self.help()?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn unknown(&mut self, line: &str) -> io::Result<()> {
        self.prompt.say("invalid command.")?;
        let word = line.split_whitespace().next().unwrap_or_default();
        let names: Vec<_> = suggestions(word).iter().map(|spec| spec.text).collect();
        if !names.is_empty() {
            self.prompt.say(format!("did you mean: {}", names.join(", ")))?;
        }
        Ok(())
    }

    fn fail(&mut self, context: &str, err: WalletError) -> io::Result<()> {
        error!("{}: {}", context, err);
        self.prompt.say(format!("{}: {}", context, err))
    }

    fn create_account(&mut self, alias: Option<&str>) -> io::Result<()> {
        let alias = match alias {
            Some(alias) => alias.to_string(),
            None => match self.prompt.input_not_blank("Enter account alias: ")? {
                Some(alias) => alias,
                None => return Ok(()),
            },
        };

        match self.wallet.create_account(&alias) {
            Ok(account) => self.prompt.say(format!(
                "Created account alias: `{}`, address: {}",
                account.alias,
                account.address()
            )),
            Err(e) => self.fail("Failed to create account", e),
        }
    }

    fn choose_account(&mut self, alias: Option<&str>) -> io::Result<()> {
        let aliases = self.wallet.account_aliases();
        if aliases.is_empty() {
            self.prompt.say("No accounts yet, creating one.")?;
            return self.create_account(alias);
        }

        let alias = match alias {
            Some(alias) => alias.to_string(),
            None => {
                self.prompt.say("Choose an account to load:")?;
                match self.prompt.multiple_choice(&aliases)? {
                    Some(alias) => alias,
                    None => return Ok(()),
                }
            }
        };

        let loaded = self.wallet.select_account(&alias).map(|account| {
            format!(
                "Loaded account alias: `{}`, address: {}",
                account.alias,
                account.address()
            )
        });
        match loaded {
            Ok(line) => self.prompt.say(line),
            Err(e) => self.fail("Failed to load account", e),
        }
    }

    /// Make sure an account is current, asking the user for one if needed.
    fn ensure_account(&mut self) -> io::Result<bool> {
        if self.wallet.current_account().is_none() {
            self.choose_account(None)?;
        }
        Ok(self.wallet.current_account().is_some())
    }

    async fn account_info(&mut self) -> io::Result<()> {
        if !self.ensure_account()? {
            return Ok(());
        }
        // Keys are still shown when the node is unreachable
        let info = match self.wallet.account_info().await {
            Ok(info) => info,
            Err(e) => {
                self.fail("Failed to get account info", e)?;
                AccountInfo::default()
            }
        };

        let Some(account) = self.wallet.current_account().cloned() else {
            return Ok(());
        };
        let private_key = Zeroizing::new(hex::encode(*account.keypair.private_key()));

        self.prompt.say(format!("Local alias: {}", account.alias))?;
        self.prompt.say(format!("Address: {}", account.address()))?;
        self.prompt.say(format!("Balance: {}", info.balance))?;
        self.prompt.say(format!("Nonce: {}", info.nonce))?;
        self.prompt.say(format!(
            "Public key: 0x{}",
            hex::encode(account.keypair.public_key())
        ))?;
        self.prompt.say(format!("Private key: 0x{}", private_key.as_str()))
    }

    async fn node_status(&mut self) -> io::Result<()> {
        let info = match self.wallet.node_info().await {
            Ok(info) => info,
            Err(e) => return self.fail("Failed to get node status", e),
        };

        let status = info.status.map(|s| s.as_str()).unwrap_or("unknown");
        let lines = [
            format!("Synced: {}", info.synced),
            format!("Synced layer: {}", info.synced_layer),
            format!("Current layer: {}", info.current_layer),
            format!("Verified layer: {}", info.verified_layer),
            format!("Peers: {}", info.peers),
            format!("Min peers: {}", info.min_peers),
            format!("Max peers: {}", info.max_peers),
            format!("Miner datadir: {}", info.datadir),
            format!("Mining status: {}", status),
            format!("Coinbase: {}", info.coinbase),
            format!("Remaining bytes: {}", info.remaining_bytes),
        ];
        for line in lines {
            self.prompt.say(line)?;
        }
        Ok(())
    }

    async fn transfer(&mut self) -> io::Result<()> {
        if !self.ensure_account()? {
            return Ok(());
        }
        let Some(account) = self.wallet.current_account().cloned() else {
            return Ok(());
        };

        self.prompt.say("Initiating transaction...")?;
        self.prompt.say(format!("Transfer from account: {}", account.alias))?;

        let address = account.address();
        let nonce = match self.wallet.current_nonce(&address).await {
            Ok(nonce) => nonce,
            Err(e) => return self.fail("Failed to get account nonce", e),
        };
        let balance = match self.wallet.transport().balance(&address).await {
            Ok(balance) => balance,
            Err(e) => return self.fail("Failed to get account balance", e.into()),
        };
        self.prompt.say(format!("Local nonce: {}, balance: {}", nonce, balance))?;

        let Some(recipient) = self.prompt.input_not_blank("Enter the recipient address: ")? else {
            return Ok(());
        };
        let recipient = match recipient.parse::<Address>() {
            Ok(address) => address,
            Err(e) => return self.fail("Invalid recipient", e),
        };

        let Some(amount) = self.prompt.input_not_blank("Enter the amount to transfer: ")? else {
            return Ok(());
        };
        let amount = match parse_amount(&amount) {
            Ok(amount) => amount,
            Err(e) => return self.fail("Invalid amount", e),
        };

        let default_price = self.wallet.default_gas_price();
        let question = format!("Use default gas price ({})? (y/n) ", default_price);
        let gas_price = match self.prompt.yes_or_no(&question)? {
            Some(true) => default_price,
            Some(false) => {
                let Some(price) = self.prompt.input_not_blank("Enter the gas price: ")? else {
                    return Ok(());
                };
                match parse_amount(&price) {
                    Ok(price) => price,
                    Err(e) => return self.fail("Invalid gas price", e),
                }
            }
            None => return Ok(()),
        };
        let gas_limit = self.wallet.default_gas_limit();

        self.prompt.say("Transaction summary:")?;
        self.prompt.say(format!("From: {}", account.address()))?;
        self.prompt.say(format!("To: {}", recipient))?;
        self.prompt.say(format!("Amount: {}", amount))?;
        self.prompt.say(format!("Gas price: {}", gas_price))?;
        self.prompt.say(format!("Gas limit: {}", gas_limit))?;
        self.prompt.say(format!("Nonce: {}", nonce))?;
        let tx = build_unsigned(nonce, recipient, amount, gas_price, gas_limit);
        match tx.total_cost() {
            Some(cost) => self.prompt.say(format!("Total cost: {}", cost))?,
            None => self.prompt.say("Warning: total cost exceeds the 64-bit range")?,
        }

        match self.prompt.yes_or_no("Confirm transaction (y/n): ")? {
            Some(true) => {}
            Some(false) => return self.prompt.say("Transaction cancelled."),
            None => return Ok(()),
        }

        match self
            .wallet
            .transfer(recipient, nonce, amount, gas_price, gas_limit)
            .await
        {
            Ok(id) => self.prompt.say(format!("Transaction submitted. ID: {}", id)),
            Err(e) => self.fail("Transaction failed", e),
        }
    }

    async fn start_mining(&mut self) -> io::Result<()> {
        if !self.ensure_account()? {
            return Ok(());
        }
        let Some(drive) = self.prompt.input_not_blank("Enter post data directory: ")? else {
            return Ok(());
        };
        let Some(space) = self.prompt.input_not_blank("Enter space allocation (GiB): ")? else {
            return Ok(());
        };
        let space = match parse_amount(&space) {
            Ok(space) => space,
            Err(e) => return self.fail("Invalid space allocation", e),
        };

        match self.wallet.start_mining(&drive, space).await {
            Ok(()) => self.prompt.say("Mining started"),
            Err(e) => self.fail("Failed to start mining", e),
        }
    }

    async fn list_txs(&mut self) -> io::Result<()> {
        if !self.ensure_account()? {
            return Ok(());
        }
        let txs = match self.wallet.list_txs().await {
            Ok(txs) => txs,
            Err(e) => return self.fail("Failed to list transactions", e),
        };

        if txs.is_empty() {
            return self.prompt.say("No transactions.");
        }
        self.prompt.say(format!("Transactions ({}):", txs.len()))?;
        for tx in txs {
            self.prompt.say(tx)?;
        }
        Ok(())
    }

    async fn set_coinbase(&mut self) -> io::Result<()> {
        if !self.ensure_account()? {
            return Ok(());
        }
        match self.wallet.set_coinbase().await {
            Ok(()) => {
                let address = self
                    .wallet
                    .current_account()
                    .map(|a| a.address().to_string())
                    .unwrap_or_default();
                self.prompt.say(format!("Rewards will be sent to {}", address))
            }
            Err(e) => self.fail("Failed to set coinbase", e),
        }
    }

    fn sign_hex(&mut self, arg: Option<&str>) -> io::Result<()> {
        if !self.ensure_account()? {
            return Ok(());
        }
        let message = match arg {
            Some(message) => message.to_string(),
            None => match self.prompt.input_not_blank("Enter message to sign (in hex): ")? {
                Some(message) => message,
                None => return Ok(()),
            },
        };

        let text = message.trim();
        let text = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let bytes = match hex::decode(text) {
            Ok(bytes) => bytes,
            Err(e) => return self.prompt.say(format!("Invalid hex message: {}", e)),
        };
        self.sign_bytes(&bytes)
    }

    fn sign_text(&mut self, arg: Option<&str>) -> io::Result<()> {
        if !self.ensure_account()? {
            return Ok(());
        }
        let message = match arg {
            Some(message) => message.to_string(),
            None => match self.prompt.input_not_blank("Enter text message to sign: ")? {
                Some(message) => message,
                None => return Ok(()),
            },
        };
        let signed = self.wallet.sign_text(&message);
        self.show_signature(signed)
    }

    fn sign_bytes(&mut self, message: &[u8]) -> io::Result<()> {
        let signed = self.wallet.sign_message(message);
        self.show_signature(signed)
    }

    fn show_signature(&mut self, signed: WalletResult<[u8; SIGNATURE_LENGTH]>) -> io::Result<()> {
        match signed {
            Ok(signature) => self
                .prompt
                .say(format!("signature (in hex): {}", hex::encode(signature))),
            Err(e) => self.fail("Failed to sign message", e),
        }
    }

    fn help(&mut self) -> io::Result<()> {
        self.prompt.say("Available commands:")?;
        for spec in COMMANDS {
            self.prompt
                .say(format!("  {:<16} {}", spec.text, spec.description))?;
        }
        Ok(())
    }
}
