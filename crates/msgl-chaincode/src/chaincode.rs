use msgl_host::LedgerHost;

use crate::config::ChaincodeConfig;

/// The messaging chaincode bound to one ledger host.
///
/// Operations are spread over the `accessors`, `write`, `query` and
/// `dispatch` modules. None of them keeps state between calls: each is a
/// function of its arguments and the host's current state.
pub struct Chaincode<H> {
    pub(crate) host: H,
    pub(crate) config: ChaincodeConfig,
}

impl<H: LedgerHost> Chaincode<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, ChaincodeConfig::default())
    }

    pub fn with_config(host: H, config: ChaincodeConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ChaincodeConfig {
        &self.config
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

impl<H> std::fmt::Debug for Chaincode<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chaincode")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
