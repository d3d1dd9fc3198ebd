use std::cmp::Ordering;
use std::fmt;

/// 配置版本号
///
/// 从配置ID中去掉所有非数字字符后，按剩余数字串的数值排序。
/// 没有任何数字的配置ID视为版本 0。
///
/// 内部保存去掉前导零的数字串，比较时先比长度再逐位比较，
/// 因此任意长度的数字串都不会溢出。
///
/// ```rust
/// use hostgate_core::models::Revision;
///
/// assert_eq!(Revision::parse("CFG-007a").as_u64(), Some(7));
/// assert!(Revision::parse("10") > Revision::parse("9"));
/// assert!(Revision::parse("abc").is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision {
    digits: String,
}

impl Revision {
    /// 解析配置ID
    pub fn parse(config_id: &str) -> Self {
        let digits: String = config_id.chars().filter(|c| c.is_ascii_digit()).collect();
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self::zero()
        } else {
            Self {
                digits: trimmed.to_string(),
            }
        }
    }

    pub fn zero() -> Self {
        Self {
            digits: "0".to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.digits == "0"
    }

    /// 规范化后的数字串
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// 数值形式，超出 `u64` 范围时返回 `None`
    pub fn as_u64(&self) -> Option<u64> {
        self.digits.parse().ok()
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for Revision {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for Revision {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl From<&str> for Revision {
    fn from(config_id: &str) -> Self {
        Self::parse(config_id)
    }
}
