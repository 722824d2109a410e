//! 段級位（段位・級位）的值物件。
//!
//! 有效標籤：
//! - 段位：`初段`、`2段` … `9段`（`1段` 不合法，一段只能寫作初段）
//! - 級位：`1級` … `20級`
//!
//! level 換算：段位為正（初段=1 … 9段=9），級位為負（1級=-1 … 20級=-20）。
//! level 越大越強，所以 9段 > 5段 > 初段 > 1級 > 20級。

use crate::utils::error::{Result, RosterError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

const SHODAN: &str = "初段";
const DAN_SUFFIX: char = '段';
const KYU_SUFFIX: char = '級';

pub const MAX_DAN: i8 = 9;
pub const MAX_KYU: i8 = 20;

fn rank_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(初段|[2-9]段|[1-9]級|1[0-9]級|20級)$").expect("rank pattern is a valid regex")
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rank {
    level: i8,
    label: String,
}

impl Rank {
    /// 從標籤解析段級位，例如 "初段"、"3段"、"5級"
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(RosterError::validation("rank is required"));
        }

        if !rank_pattern().is_match(input) {
            return Err(RosterError::validation(format!(
                "invalid rank format: {}",
                input
            )));
        }

        if input == SHODAN {
            return Ok(Self {
                level: 1,
                label: SHODAN.to_string(),
            });
        }

        let (digits, sign) = if let Some(digits) = input.strip_suffix(DAN_SUFFIX) {
            (digits, 1)
        } else if let Some(digits) = input.strip_suffix(KYU_SUFFIX) {
            (digits, -1)
        } else {
            return Err(RosterError::validation(format!(
                "invalid rank format: {}",
                input
            )));
        };

        let number: i8 = digits
            .parse()
            .map_err(|_| RosterError::validation(format!("invalid rank number: {}", input)))?;

        Ok(Self {
            level: sign * number,
            label: input.to_string(),
        })
    }

    /// level 反推標籤，供只保存數值的儲存層使用
    pub fn from_level(level: i8) -> Result<Self> {
        let label = match level {
            1 => SHODAN.to_string(),
            2..=MAX_DAN => format!("{}{}", level, DAN_SUFFIX),
            -20..=-1 => format!("{}{}", -level, KYU_SUFFIX),
            _ => {
                return Err(RosterError::validation(format!(
                    "rank level out of range: {}",
                    level
                )))
            }
        };
        Ok(Self { level, label })
    }

    pub fn level(&self) -> i8 {
        self.level
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_dan(&self) -> bool {
        self.level > 0
    }

    /// 種子排序用的比較：強者在前（level 降冪）
    pub fn seeding_cmp(&self, other: &Self) -> Ordering {
        other.level.cmp(&self.level)
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level
    }
}

impl Eq for Rank {}

impl Hash for Rank {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level.hash(state);
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level.cmp(&other.level)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for Rank {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rank {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.label
    }
}
