//! Advisory volume flags

use crate::config::FlagConfig;

/// Volume annotation attached to a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeFlag {
    /// Line count at or above the high-volume threshold
    HighVolume,
    /// Small order: at least one line and no more than the low-volume maximum
    LowVolume,
}

impl VolumeFlag {
    pub fn label(&self) -> &'static str {
        match self {
            VolumeFlag::HighVolume => "10+ LINES",
            VolumeFlag::LowVolume => "CHECKERED FLAG",
        }
    }
}

impl std::fmt::Display for VolumeFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a line count; the two ranges never overlap
pub fn volume_flag(line_count: u32, config: &FlagConfig) -> Option<VolumeFlag> {
    if line_count >= config.high_volume_threshold {
        Some(VolumeFlag::HighVolume)
    } else if line_count > 0 && line_count <= config.low_volume_max {
        Some(VolumeFlag::LowVolume)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_boundaries() {
        let config = FlagConfig::default();
        assert_eq!(volume_flag(10, &config), Some(VolumeFlag::HighVolume));
        assert_eq!(volume_flag(250, &config), Some(VolumeFlag::HighVolume));
        assert_eq!(volume_flag(9, &config), None);
        assert_eq!(volume_flag(4, &config), None);
        assert_eq!(volume_flag(3, &config), Some(VolumeFlag::LowVolume));
        assert_eq!(volume_flag(1, &config), Some(VolumeFlag::LowVolume));
        assert_eq!(volume_flag(0, &config), None);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = FlagConfig {
            high_volume_threshold: 20,
            low_volume_max: 5,
        };
        assert_eq!(volume_flag(10, &config), None);
        assert_eq!(volume_flag(5, &config), Some(VolumeFlag::LowVolume));
        assert_eq!(volume_flag(20, &config), Some(VolumeFlag::HighVolume));
    }

    #[test]
    fn test_labels() {
        assert_eq!(VolumeFlag::HighVolume.to_string(), "10+ LINES");
        assert_eq!(VolumeFlag::LowVolume.label(), "CHECKERED FLAG");
    }
}
