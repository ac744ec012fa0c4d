//! Consistency levels and write types, as far as retry decisions need them

use nodewise_common::impl_name_conversions;
use serde::{Deserialize, Serialize};

/// Replica acknowledgements required before an operation succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    LocalOne,
}

impl_name_conversions!(ConsistencyLevel {
    Any => "ANY",
    One => "ONE",
    Two => "TWO",
    Three => "THREE",
    Quorum => "QUORUM",
    All => "ALL",
    LocalQuorum => "LOCAL_QUORUM",
    EachQuorum => "EACH_QUORUM",
    Serial => "SERIAL",
    LocalSerial => "LOCAL_SERIAL",
    LocalOne => "LOCAL_ONE",
});

impl ConsistencyLevel {
    /// Lightweight-transaction levels (Paxos phase)
    pub fn is_serial(self) -> bool {
        matches!(self, Self::Serial | Self::LocalSerial)
    }

    /// Levels that may only be satisfied by replicas in the coordinator's
    /// datacenter
    pub fn is_dc_local(self) -> bool {
        matches!(self, Self::LocalQuorum | Self::LocalSerial | Self::LocalOne)
    }
}

/// Kind of write that timed out, as reported by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriteType {
    /// Non-batched, non-counter write
    Simple,
    /// Logged batch; the batch log write succeeded
    Batch,
    /// Unlogged batch; no atomicity guarantee
    UnloggedBatch,
    /// Counter update; never safe to replay
    Counter,
    /// Timeout while writing the batch log itself
    BatchLog,
    /// Compare-and-set write
    Cas,
    /// Materialized view update
    View,
    /// Change-data-capture write
    Cdc,
}

impl_name_conversions!(WriteType {
    Simple => "SIMPLE",
    Batch => "BATCH",
    UnloggedBatch => "UNLOGGED_BATCH",
    Counter => "COUNTER",
    BatchLog => "BATCH_LOG",
    Cas => "CAS",
    View => "VIEW",
    Cdc => "CDC",
});
