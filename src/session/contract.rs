//! Crime-report contract binding.
//!
//! The contract itself lives on-chain; this module only describes its
//! interface and binds it to the signer of the active account.

use alloy::contract::SolCallBuilder;
use alloy::primitives::Address;
use alloy::providers::DynProvider;
use alloy::sol;

sol! {
    #[sol(rpc)]
    contract CrimeReport {
        struct Report {
            uint256 id;
            address reporter;
            string evidenceCid;
            string description;
            uint64 timestamp;
            bool verified;
        }

        event ReportSubmitted(uint256 indexed id, address indexed reporter);

        function submitReport(string evidenceCid, string description) external returns (uint256 id);
        function getReport(uint256 id) external view returns (Report memory);
        function reportCount() external view returns (uint256);
        function admin() external view returns (address);
    }
}

/// Authorization context for one wallet account.
///
/// Signing happens inside the wallet; requests sent through `provider` with
/// `from = account` are signed there.
#[derive(Clone)]
pub struct SignerContext {
    account: Address,
    provider: DynProvider,
}

impl SignerContext {
    pub fn new(account: Address, provider: DynProvider) -> Self {
        Self { account, provider }
    }

    /// Account the wallet signs for.
    pub fn address(&self) -> Address {
        self.account
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

impl std::fmt::Debug for SignerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerContext")
            .field("account", &self.account)
            .finish()
    }
}

/// Callable handle to the deployed contract, bound to a signer.
#[derive(Clone)]
pub struct ContractHandle {
    signer: SignerContext,
    instance: CrimeReport::CrimeReportInstance<DynProvider>,
}

impl ContractHandle {
    /// Bind the interface at `address` to `signer`. No network access.
    pub fn bind(address: Address, signer: SignerContext) -> Self {
        let instance = CrimeReport::new(address, signer.provider().clone());
        Self { signer, instance }
    }

    /// Deployed contract address.
    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    pub fn signer(&self) -> &SignerContext {
        &self.signer
    }

    /// Raw alloy binding.
    pub fn instance(&self) -> &CrimeReport::CrimeReportInstance<DynProvider> {
        &self.instance
    }

    /// Prepare a `submitReport` transaction from the signer's account.
    pub fn submit_report(
        &self,
        evidence_cid: String,
        description: String,
    ) -> SolCallBuilder<&DynProvider, CrimeReport::submitReportCall> {
        self.instance
            .submitReport(evidence_cid, description)
            .from(self.signer.address())
    }
}

impl std::fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address())
            .field("signer", &self.signer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use alloy::providers::{Provider, ProviderBuilder};
    use alloy::sol_types::SolCall;

    fn offline_provider() -> DynProvider {
        let url: url::Url = "http://127.0.0.1:1".parse().unwrap();
        ProviderBuilder::new().connect_http(url).erased()
    }

    #[test]
    fn test_bind_keeps_address_and_signer() {
        let contract = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let account = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let handle = ContractHandle::bind(contract, SignerContext::new(account, offline_provider()));

        assert_eq!(handle.address(), contract);
        assert_eq!(handle.signer().address(), account);
    }

    #[test]
    fn test_submit_report_calldata() {
        let contract = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let account = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let handle = ContractHandle::bind(contract, SignerContext::new(account, offline_provider()));

        let call = handle.submit_report("bafybeigdyrzt".to_string(), "theft near station".to_string());
        let calldata = call.calldata();
        assert_eq!(&calldata[..4], CrimeReport::submitReportCall::SELECTOR.as_slice());
    }
}
