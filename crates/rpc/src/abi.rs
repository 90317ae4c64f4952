//! Minimal ABI plumbing for the one event and one view call the sync needs.
//!
//! The game contract surface is tiny, so topics, calldata and return words
//! are encoded and decoded by hand rather than through full ABI machinery.

use crate::types::Log;
use runtally_interfaces::RequestError;
use runtally_primitives::{Address, RunEndedEvent, RunId, RunMetadata};

/// `keccak256("RunEnded(bytes32,uint256,address)")`, the topic0 of the event
/// the sync scans for. All three arguments are indexed.
pub const RUN_ENDED_TOPIC: &str =
    "0x562d7c36e40f8d795775750231c882a408932e0fd873aa57b73073eb7e6774ca";

/// `keccak256("runsById(bytes32)")[..4]`, the selector of the run lookup.
pub const RUNS_BY_ID_SELECTOR: &str = "0x5c53def2";

/// Fractional digits in on-chain earnings amounts.
const EARNINGS_DECIMALS: u32 = 18;

/// Parses a `0x`-prefixed hex quantity, e.g. an `eth_blockNumber` response.
pub fn parse_quantity(value: &str) -> Result<u64, RequestError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| RequestError::Decode(format!("Quantity without 0x prefix: {value}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|err| RequestError::Decode(format!("Bad quantity {value}: {err}")))
}

/// Formats a block height as a `0x`-prefixed hex quantity.
pub fn format_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// Calldata for `runsById(run_id)`.
pub fn encode_runs_by_id_call(run_id: &RunId) -> String {
    format!("{}{}", RUNS_BY_ID_SELECTOR, hex::encode(run_id.as_bytes()))
}

/// Decodes a `RunEnded` log into an event.
///
/// Topic layout: `[topic0, runId, runnerId, recipient]`.
pub fn decode_run_ended(log: &Log) -> Result<RunEndedEvent, RequestError> {
    if log.topics.len() != 4 {
        return Err(RequestError::Decode(format!(
            "Expected 4 RunEnded topics, got {}",
            log.topics.len()
        )))
    }
    Ok(RunEndedEvent {
        run_id: RunId(word_bytes(&log.topics[1])?),
        runner_id: word_to_u64(&log.topics[2])?,
        recipient: word_to_address(&log.topics[3])?,
    })
}

/// Decodes the return data of `runsById` into run metadata.
///
/// Word layout: `[notorietyPoints, earnings, startTime, endTime]`. The time
/// fields use zero as the contract's unset sentinel and map to `None`; the
/// earnings amount is truncated from 18-decimal fixed point to whole tokens.
pub fn decode_run_metadata(data: &str) -> Result<RunMetadata, RequestError> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    if digits.len() != 4 * 64 {
        return Err(RequestError::Decode(format!(
            "Expected 4 return words, got {} hex chars",
            digits.len()
        )))
    }
    let word = |index: usize| word_bytes(&digits[index * 64..(index + 1) * 64]);

    let notoriety_points = word_to_u64_checked(word(0)?)?;
    let earnings = truncate_decimals(word(1)?)?;
    let start_time = word_to_u64_checked(word(2)?)?;
    let end_time = word_to_u64_checked(word(3)?)?;

    Ok(RunMetadata {
        notoriety_points: Some(notoriety_points),
        earnings: Some(earnings),
        start_time: zero_as_none(start_time),
        end_time: zero_as_none(end_time),
    })
}

fn zero_as_none(value: u64) -> Option<u64> {
    (value != 0).then_some(value)
}

fn word_bytes(word: &str) -> Result<[u8; 32], RequestError> {
    let digits = word.strip_prefix("0x").unwrap_or(word);
    let bytes = hex::decode(digits)
        .map_err(|err| RequestError::Decode(format!("Bad hex word {word}: {err}")))?;
    bytes
        .try_into()
        .map_err(|_| RequestError::Decode(format!("Expected a 32-byte word: {word}")))
}

fn word_to_u64(word: &str) -> Result<u64, RequestError> {
    word_to_u64_checked(word_bytes(word)?)
}

fn word_to_u64_checked(bytes: [u8; 32]) -> Result<u64, RequestError> {
    if bytes[..24].iter().any(|byte| *byte != 0) {
        return Err(RequestError::Decode("uint word overflows u64".to_string()))
    }
    Ok(u64::from_be_bytes(bytes[24..].try_into().expect("8 bytes")))
}

fn word_to_address(word: &str) -> Result<Address, RequestError> {
    let bytes = word_bytes(word)?;
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes[12..]);
    Ok(Address(out))
}

/// Truncates an 18-decimal fixed point amount to whole tokens.
fn truncate_decimals(bytes: [u8; 32]) -> Result<u64, RequestError> {
    // Realistic token amounts fit 128 bits; anything wider is a decode bug.
    if bytes[..16].iter().any(|byte| *byte != 0) {
        return Err(RequestError::Decode("earnings amount overflows u128".to_string()))
    }
    let raw = u128::from_be_bytes(bytes[16..].try_into().expect("16 bytes"));
    let whole = raw / 10u128.pow(EARNINGS_DECIMALS);
    u64::try_from(whole)
        .map_err(|_| RequestError::Decode("earnings amount overflows u64".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_of(value: u128) -> String {
        format!("{value:064x}")
    }

    #[test]
    fn quantity_round_trip() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1c9c364").unwrap(), 0x1c9c364);
        assert_eq!(parse_quantity(&format_quantity(25_310_000)).unwrap(), 25_310_000);
    }

    #[test]
    fn quantity_requires_the_prefix() {
        assert!(parse_quantity("1c9c364").is_err());
    }

    #[test]
    fn runs_by_id_calldata_is_selector_plus_word() {
        let data = encode_runs_by_id_call(&RunId([0xab; 32]));
        assert!(data.starts_with(RUNS_BY_ID_SELECTOR));
        assert_eq!(data.len(), "0x".len() + 8 + 64);
    }

    #[test]
    fn decodes_a_run_ended_log() {
        let log = Log {
            topics: vec![
                RUN_ENDED_TOPIC.to_string(),
                format!("0x{}", hex::encode([0x11; 32])),
                format!("0x{}", word_of(42)),
                format!("0x{}", word_of(0xff)),
            ],
            data: String::new(),
        };

        let event = decode_run_ended(&log).unwrap();
        assert_eq!(event.run_id, RunId([0x11; 32]));
        assert_eq!(event.runner_id, 42);
        assert_eq!(event.recipient.as_bytes()[19], 0xff);
    }

    #[test]
    fn rejects_a_log_with_missing_topics() {
        let log = Log { topics: vec![RUN_ENDED_TOPIC.to_string()], data: String::new() };
        assert!(decode_run_ended(&log).is_err());
    }

    #[test]
    fn decodes_run_metadata_and_truncates_earnings() {
        // 5.9 tokens in 18-decimal fixed point truncate to 5.
        let data = format!(
            "0x{}{}{}{}",
            word_of(12),
            word_of(5_900_000_000_000_000_000),
            word_of(1_000),
            word_of(2_000),
        );

        let meta = decode_run_metadata(&data).unwrap();
        assert_eq!(meta.notoriety_points, Some(12));
        assert_eq!(meta.earnings, Some(5));
        assert_eq!(meta.start_time, Some(1_000));
        assert_eq!(meta.end_time, Some(2_000));
    }

    #[test]
    fn zero_times_decode_as_unset() {
        let data = format!("0x{}{}{}{}", word_of(0), word_of(0), word_of(0), word_of(0));

        let meta = decode_run_metadata(&data).unwrap();
        assert_eq!(meta.start_time, None);
        assert_eq!(meta.end_time, None);
        assert_eq!(meta.earnings, Some(0));
    }

    #[test]
    fn oversized_uint_words_are_rejected() {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        let data = format!("0x{}{}{}{}", hex::encode(bytes), word_of(0), word_of(0), word_of(0));

        assert!(decode_run_metadata(&data).is_err());
    }
}
