//! Contract session.
//!
//! Binds one signing account and one deployed contract to a node connection
//! and exposes the two ways of talking to the contract: `transact` for
//! state-changing calls and `call` for read-only queries.

use std::time::Duration;

use alloy::{
    dyn_abi::DynSolValue,
    network::TransactionBuilder,
    primitives::{Address, TxHash},
    rpc::types::TransactionRequest,
};

use crate::{
    config::Config,
    error::{AppError, Result},
    ethereum::{
        constants::DEFAULT_RECEIPT_POLL_INTERVAL, ChainClient, ContractAbi, EthereumClient,
        WalletManager,
    },
};

/// A signing account bound to one contract on one node.
///
/// `transact` takes `&mut self`: concurrent submissions from one session would
/// race on the nonce, so callers sharing a session must serialize access.
pub struct ContractSession<C: ChainClient = EthereumClient> {
    client: C,
    wallet: WalletManager,
    contract_address: Address,
    abi: ContractAbi,
    gas_limit: u64,
    poll_interval: Duration,
    last_transaction: Option<TxHash>,
}

impl ContractSession<EthereumClient> {
    /// Build a session from configuration: connect lazily, load the key and the ABI.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = EthereumClient::new(&config.rpc_url)?;
        let wallet = WalletManager::from_private_key(&config.private_key)?;
        let abi = ContractAbi::from_file(&config.abi_path)?;

        Ok(Self::new(client, wallet, &config.contract_address, abi, config.gas_limit)?
            .with_poll_interval(config.receipt_poll_interval))
    }
}

impl<C: ChainClient> ContractSession<C> {
    /// Create a session.
    ///
    /// The contract address is normalised to its checksummed form; a
    /// mixed-case address whose checksum does not verify is rejected.
    pub fn new(
        client: C,
        wallet: WalletManager,
        contract_address: &str,
        abi: ContractAbi,
        gas_limit: u64,
    ) -> Result<Self> {
        let contract_address = parse_contract_address(contract_address)?;

        tracing::info!(
            sender = %wallet.address(),
            contract = %contract_address.to_checksum(None),
            gas_limit,
            "Contract session created"
        );

        Ok(Self {
            client,
            wallet,
            contract_address,
            abi,
            gas_limit,
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            last_transaction: None,
        })
    }

    /// Set the delay between receipt polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Address transactions are sent from, derived from the signing key.
    pub fn sender(&self) -> Address {
        self.wallet.address()
    }

    /// Address of the bound contract.
    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// The bound contract's ABI.
    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    /// Gas limit attached to every transaction.
    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Hash of the most recently submitted transaction, if any.
    pub fn last_transaction(&self) -> Option<TxHash> {
        self.last_transaction
    }

    /// The node client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Build the unsigned request for invoking `method` with `args`.
    ///
    /// Uses the sender's current on-chain nonce, the fixed gas limit, the
    /// node's gas price and the connected chain id.
    pub async fn build_transaction(
        &self,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<TransactionRequest> {
        let data = self.abi.encode_call(method, args)?;
        let sender = self.sender();

        let nonce = self.client.transaction_count(sender).await?;
        let chain_id = self.client.chain_id().await?;
        let gas_price = self.client.gas_price().await?;

        tracing::debug!(
            method,
            sender = %sender,
            nonce,
            chain_id,
            gas_limit = self.gas_limit,
            gas_price,
            "Built transaction"
        );

        Ok(TransactionRequest::default()
            .with_from(sender)
            .with_to(self.contract_address)
            .with_input(data)
            .with_nonce(nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(gas_price)
            .with_chain_id(chain_id))
    }

    /// Invoke `method` as a transaction and wait until it is mined.
    ///
    /// Blocks without timeout until the node reports a receipt. Node
    /// rejections (insufficient funds, nonce conflicts, ...) are returned
    /// unchanged; nothing is retried.
    pub async fn transact(&mut self, method: &str, args: &[DynSolValue]) -> Result<C::Receipt> {
        let hash = self.submit(method, args).await?;
        let receipt = wait_for_receipt(&self.client, hash, self.poll_interval).await?;
        tracing::info!(tx_hash = %hash, "Done!");
        Ok(receipt)
    }

    /// Like [`transact`](Self::transact), with arguments given as text and
    /// coerced to the method's parameter types.
    pub async fn transact_str(&mut self, method: &str, args: &[String]) -> Result<C::Receipt> {
        let values = self.abi.parse_args(method, args)?;
        self.transact(method, &values).await
    }

    /// Build, sign and submit a transaction without waiting for it to be mined.
    ///
    /// Records and returns the transaction hash. Pair with
    /// [`wait_for_receipt`] when the session is shared and must not stay
    /// borrowed while the transaction is pending.
    pub async fn submit(&mut self, method: &str, args: &[DynSolValue]) -> Result<TxHash> {
        let tx = self.build_transaction(method, args).await?;
        let raw = self.wallet.sign_transaction(tx).await?;
        let hash = self.client.send_raw_transaction(&raw).await?;
        self.last_transaction = Some(hash);

        tracing::info!(tx_hash = %hash, "Transaction sent, please wait...");
        Ok(hash)
    }

    /// Like [`submit`](Self::submit), with arguments given as text.
    pub async fn submit_str(&mut self, method: &str, args: &[String]) -> Result<TxHash> {
        let values = self.abi.parse_args(method, args)?;
        self.submit(method, &values).await
    }

    /// Invoke `method` as a read-only call and return the decoded outputs.
    ///
    /// Nothing is signed or submitted; no gas is spent and no state changes.
    pub async fn call(&self, method: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
        let data = self.abi.encode_call(method, args)?;

        let tx = TransactionRequest::default()
            .with_from(self.sender())
            .with_to(self.contract_address)
            .with_input(data);

        tracing::debug!(method, contract = %self.contract_address, "Calling contract");

        let output = self.client.call(tx).await?;
        self.abi.decode_output(method, args.len(), &output)
    }

    /// Like [`call`](Self::call), with arguments given as text.
    pub async fn call_str(&self, method: &str, args: &[String]) -> Result<Vec<DynSolValue>> {
        let values = self.abi.parse_args(method, args)?;
        self.call(method, &values).await
    }

    /// Delay between receipt polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Poll `client` until `hash` has a receipt. There is no timeout.
pub async fn wait_for_receipt<C: ChainClient>(
    client: &C,
    hash: TxHash,
    poll_interval: Duration,
) -> Result<C::Receipt> {
    let mut polls: u64 = 0;
    loop {
        if let Some(receipt) = client.transaction_receipt(hash).await? {
            return Ok(receipt);
        }
        polls += 1;
        if polls % 20 == 0 {
            tracing::debug!(tx_hash = %hash, polls, "Still waiting for receipt");
        }
        tokio::time::sleep(poll_interval).await;
    }
}

impl<C: ChainClient> std::fmt::Debug for ContractSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractSession")
            .field("sender", &self.wallet.address())
            .field("contract_address", &self.contract_address)
            .field("gas_limit", &self.gas_limit)
            .field("last_transaction", &self.last_transaction)
            .finish_non_exhaustive()
    }
}

/// Parse a contract address, verifying the EIP-55 checksum when the input is mixed-case.
pub fn parse_contract_address(s: &str) -> Result<Address> {
    let trimmed = s.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| AppError::InvalidAddress(format!("Address must start with '0x': {}", s)))?;

    if hex.len() != 40 {
        return Err(AppError::InvalidAddress(format!(
            "Address must be 42 characters (0x + 40 hex chars), got {}: {}",
            trimmed.len(),
            s
        )));
    }

    let is_lower = !hex.chars().any(|c| c.is_ascii_uppercase());
    let is_upper = !hex.chars().any(|c| c.is_ascii_lowercase());

    if is_lower || is_upper {
        hex.parse::<Address>().map_err(|e| AppError::InvalidAddress(format!("{}: {}", s, e)))
    } else {
        Ok(Address::parse_checksummed(format!("0x{}", hex), None)?)
    }
}
