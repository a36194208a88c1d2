//! Protocol configuration constants (mirrors the teacher's `config.rs` Gray
//! Paper constants section, trimmed to what the state-transition core and
//! accumulation host calls consume).

/// `H`: bound on the recent-blocks window.
pub const MAX_RECENT_BLOCKS: usize = 8;
/// `O`: bound on a core's authorizer pool.
pub const MAX_AUTHORIZERS_PER_CORE: usize = 8;
/// `Q`: length of a core's pending-authorizers ring.
pub const PENDING_AUTHORIZERS_QUEUE_SIZE: usize = 80;
/// Size of the entropy pool (current + 3 historical).
pub const ENTROPY_POOL_SIZE: usize = 4;
/// `M`: transfer memo width in bytes.
pub const TRANSFER_MEMO_SIZE: usize = 128;
/// `BS`: basic minimum balance every service must carry.
pub const BASIC_MINIMUM_BALANCE: u64 = 100;
/// `BI`: additional minimum balance per elective storage item.
pub const ITEM_DEPOSIT: u64 = 10;
/// `BL`: additional minimum balance per elective storage octet.
pub const BYTE_DEPOSIT: u64 = 1;
/// Width of a serialized `ValidatorKey` (32 + 32 + 144 + 128).
pub const VALIDATOR_KEY_SIZE: usize = 336;
/// Width of a `ServiceId`.
pub const SERVICE_ID_SIZE: usize = 4;
/// Width of a hash.
pub const HASH_SIZE: usize = 32;
/// Gray Paper: serviceid ≡ N_bits(32); one past the maximum representable id.
pub const MAX_SERVICE_ID: u64 = 1 << 32;
/// Lower bound of the publicly-allocatable service-id range; below this is
/// the reserved range a registrar may target directly.
pub const MIN_PUBLIC_SERVICE_ID: u64 = 65_536;
/// Modulus for the v0.7.1+ next-free-id bump: `2^32 - 2^8 - MinPublicIndex`.
pub const NEXT_FREE_ID_MODULUS: u64 = (1u64 << 32) - 256 - MIN_PUBLIC_SERVICE_ID;

/// `"$jam_guarantee"` — the ASCII context string prepended before hashing a
/// guarantee's work-report for Ed25519 verification.
pub const GUARANTEE_SIGNATURE_CONTEXT: &[u8] = b"$jam_guarantee";

/// Fixed gas costs charged by each accumulation host call before its effect
/// runs; `gas < cost` is the out-of-gas sentinel (not a return code).
pub mod gas_cost {
    pub const EMPOWER: u64 = 10;
    pub const ASSIGN: u64 = 10;
    pub const DESIGNATE: u64 = 10;
    pub const CHECKPOINT: u64 = 10;
    pub const NEW: u64 = 10;
    pub const UPGRADE: u64 = 10;
    pub const TRANSFER_BASE: u64 = 10;
    pub const QUIT: u64 = 10;
    pub const SOLICIT: u64 = 10;
    pub const FORGET: u64 = 10;
    /// Charged once for any unrecognized host-call number (Gray Paper: `WHAT`).
    pub const UNKNOWN_CALL: u64 = 10;
}

/// VM host-call function numbers dispatched by the accumulation driver (Ψ_A)
/// and the on-transfer driver (Ψ_T). Mirrors the teacher's `FUNC_*` table,
/// restricted to the calls this core's accumulation surface defines.
pub mod func {
    pub const GAS: u8 = 0;
    pub const LOOKUP: u8 = 2;
    pub const READ: u8 = 3;
    pub const WRITE: u8 = 4;
    pub const INFO: u8 = 5;
    pub const EMPOWER: u8 = 14;
    pub const ASSIGN: u8 = 15;
    pub const DESIGNATE: u8 = 16;
    pub const CHECKPOINT: u8 = 17;
    pub const NEW: u8 = 18;
    pub const UPGRADE: u8 = 19;
    pub const TRANSFER: u8 = 20;
    pub const QUIT: u8 = 21;
    pub const SOLICIT: u8 = 23;
    pub const FORGET: u8 = 24;
}

/// Entry-point indices the accumulation and on-transfer drivers invoke the
/// VM at.
pub const ACCUMULATE_ENTRY_POINT: u8 = 10;
pub const ON_TRANSFER_ENTRY_POINT: u8 = 15;

/// Per-chain tunables that are not Gray Paper fixed constants: core count,
/// validator count, and the three configurable periods. Passed explicitly
/// into every STF and accumulation entry point — this crate has no
/// environment or file I/O layer of its own, but the type is (de)serializable
/// so an embedder can load it from a chain-spec file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub total_cores: u16,
    pub validator_count: u16,
    /// `R`: timeslots between validator-set rotations.
    pub rotation_period: u32,
    /// `U`: timeslots a core stays busy after a work-report before timing out.
    pub work_report_timeout_period: u32,
    /// `D`: timeslots a preimage must sit before it can be expunged.
    pub preimage_expunge_period: u32,
    /// Timeslots per epoch.
    pub epoch_length: u32,
}

impl Config {
    /// `⌊2V/3⌋ + 1`.
    #[must_use]
    pub const fn validators_super_majority(&self) -> u32 {
        (2 * self.validator_count as u32) / 3 + 1
    }

    /// `⌊V/3⌋`.
    #[must_use]
    pub const fn validators_wonky_threshold(&self) -> u32 {
        self.validator_count as u32 / 3
    }

    /// `⌊2V/3⌋` — the availability-assurance threshold.
    #[must_use]
    pub const fn availability_threshold(&self) -> u32 {
        (2 * self.validator_count as u32) / 3
    }

    /// Parses a chain-spec JSON document into a `Config`.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serializes this `Config` as a chain-spec JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Default for Config {
    /// Mirrors the teacher's `FetchSystemConstantsConfig::default()` values
    /// where they overlap with this core's scope.
    fn default() -> Self {
        Self {
            total_cores: 341,
            validator_count: 1023,
            rotation_period: 10,
            work_report_timeout_period: 5,
            preimage_expunge_period: 19_200,
            epoch_length: 600,
        }
    }
}
