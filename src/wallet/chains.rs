use std::fmt;

/// Chains the demo knows by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoChain {
    Base,
    Optimism,
    Degen,
    Mainnet,
    Unichain,
    MonadTestnet,
}

impl DemoChain {
    pub const ALL: [DemoChain; 6] = [
        DemoChain::Base,
        DemoChain::Optimism,
        DemoChain::Degen,
        DemoChain::Mainnet,
        DemoChain::Unichain,
        DemoChain::MonadTestnet,
    ];

    pub fn id(self) -> u64 {
        match self {
            DemoChain::Base => 8453,
            DemoChain::Optimism => 10,
            DemoChain::Degen => 666666666,
            DemoChain::Mainnet => 1,
            DemoChain::Unichain => 130,
            DemoChain::MonadTestnet => 10143,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DemoChain::Base => "Base",
            DemoChain::Optimism => "OP Mainnet",
            DemoChain::Degen => "Degen",
            DemoChain::Mainnet => "Ethereum",
            DemoChain::Unichain => "Unichain",
            DemoChain::MonadTestnet => "Monad Testnet",
        }
    }

    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|chain| chain.id() == id)
    }

    /// Chain the "switch chain" action moves to from `current`
    ///
    /// Cycles Base → OP Mainnet → Degen → Ethereum → Unichain → Base; any
    /// other chain goes to Base.
    pub fn next_after(current: Option<u64>) -> Self {
        match current.and_then(Self::from_id) {
            Some(DemoChain::Base) => DemoChain::Optimism,
            Some(DemoChain::Optimism) => DemoChain::Degen,
            Some(DemoChain::Degen) => DemoChain::Mainnet,
            Some(DemoChain::Mainnet) => DemoChain::Unichain,
            _ => DemoChain::Base,
        }
    }
}

impl fmt::Display for DemoChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
