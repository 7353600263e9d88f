use super::ResultToken;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// A normalized game: cleaned move text, the terminal token and the plies
/// played at each move number.
///
/// On the wire this is a flat JSON object: `pgn` and `result` first, then one
/// key per move number (`"1"`, `"2"`, ...) in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalGame {
    pub pgn: String,
    pub result: String,
    pub moves: BTreeMap<u32, Vec<String>>,
}

impl CanonicalGame {
    /// Plies recorded under `number`, if any.
    pub fn plies(&self, number: u32) -> Option<&[String]> {
        self.moves.get(&number).map(Vec::as_slice)
    }

    /// Total number of plies across all move numbers.
    pub fn ply_count(&self) -> usize {
        self.moves.values().map(Vec::len).sum()
    }

    pub fn result_token(&self) -> Option<ResultToken> {
        ResultToken::parse(&self.result)
    }
}

impl Serialize for CanonicalGame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.moves.len() + 2))?;
        map.serialize_entry("pgn", &self.pgn)?;
        map.serialize_entry("result", &self.result)?;
        for (number, plies) in &self.moves {
            map.serialize_entry(&number.to_string(), plies)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct CanonicalGameProxy {
    pgn: String,
    result: String,
    #[serde(flatten)]
    moves: BTreeMap<String, Vec<String>>,
}

impl<'de> Deserialize<'de> for CanonicalGame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = CanonicalGameProxy::deserialize(deserializer)?;
        let mut moves = BTreeMap::new();
        for (key, plies) in proxy.moves {
            let number = key
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| D::Error::custom(format!("invalid move number key: {key}")))?;
            moves.insert(number, plies);
        }
        Ok(Self {
            pgn: proxy.pgn,
            result: proxy.result,
            moves,
        })
    }
}
