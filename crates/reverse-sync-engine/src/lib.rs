//! Reverse-sync engine: maps block-level edits of an MDX rendering back onto
//! the Confluence storage markup it was generated from.
//!
//! The pipeline is parse ([`parsing`]) -> diff ([`diff`]) -> record the
//! markup's blocks ([`mapping`]) -> match and transfer edits ([`matcher`],
//! [`transfer`]) -> build patches ([`patches`]) -> apply them ([`patcher`])
//! -> verify the roundtrip ([`verify`]). [`sync`] runs it end to end.

/// Defines `fn $name() -> &'static Regex`, compiled on first use.
macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| {
                ::regex::Regex::new($pattern).expect(concat!("Invalid ", stringify!($name)))
            })
        }
    };
}

pub mod converter;
pub mod diff;
pub mod error;
pub mod fragment;
pub mod mapping;
pub mod markup;
pub mod matcher;
pub mod normalize;
pub mod parsing;
pub mod patcher;
pub mod patches;
pub mod sync;
pub mod transfer;
pub mod verify;

pub use converter::{ConvertError, ForwardConverter};
pub use diff::{BlockChange, diff_blocks};
pub use error::SyncError;
pub use mapping::{MappingRecord, RecordKind, record_mapping};
pub use matcher::{BlockMatcher, MatchContext, MatchOptions};
pub use parsing::{
    blocks::{BlockKind, TextBlock},
    parse_blocks,
};
pub use patcher::apply_patches;
pub use patches::{Patch, PatchPayload, build_patches};
pub use sync::{Plan, SyncOutcome, SyncStatus, plan, run};
pub use verify::{VerifyResult, verify};
