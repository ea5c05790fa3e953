//! Device profile
//!
//! User-agent sniffing decides whether the page runs in its lighter mobile
//! mode: the body is tagged and default tween durations are shortened.

use std::sync::OnceLock;

use regex::Regex;

const MOBILE_PATTERN: &str = r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini";

fn mobile_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(MOBILE_PATTERN) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("device: invalid mobile pattern: {}", e);
            None
        }
    })
    .as_ref()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceProfile {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceProfile {
    pub fn detect(user_agent: &str) -> Self {
        match mobile_regex() {
            Some(re) if re.is_match(user_agent) => DeviceProfile::Mobile,
            _ => DeviceProfile::Desktop,
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceProfile::Mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let android = "Mozilla/5.0 (Linux; android 14; Pixel 8) AppleWebKit/537.36";
        let desktop = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

        assert_eq!(DeviceProfile::detect(iphone), DeviceProfile::Mobile);
        assert_eq!(DeviceProfile::detect(android), DeviceProfile::Mobile);
        assert_eq!(DeviceProfile::detect("Opera Mini/8.0"), DeviceProfile::Mobile);
        assert_eq!(DeviceProfile::detect(desktop), DeviceProfile::Desktop);
        assert_eq!(DeviceProfile::detect(""), DeviceProfile::Desktop);
    }
}
