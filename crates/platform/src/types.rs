//! Shared types for battery property access.

use std::fmt;

/// Battery charging state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeState {
    /// Battery is actively charging
    Charging,
    /// Battery is discharging (on battery power)
    Discharging,
    /// External power connected but not charging (e.g., charge limit reached)
    NotCharging,
    /// Battery is full
    Full,
    /// State cannot be determined
    #[default]
    Unknown,
}

impl ChargeState {
    /// Returns a human-readable label for the charge state.
    pub fn label(&self) -> &'static str {
        match self {
            ChargeState::Charging => "Charging",
            ChargeState::Discharging => "Discharging",
            ChargeState::NotCharging => "Not Charging",
            ChargeState::Full => "Full",
            ChargeState::Unknown => "Unknown",
        }
    }

    /// Numeric code written to the CSV status column.
    pub fn code(&self) -> i32 {
        match self {
            ChargeState::Unknown => 1,
            ChargeState::Charging => 2,
            ChargeState::Discharging => 3,
            ChargeState::NotCharging => 4,
            ChargeState::Full => 5,
        }
    }

    /// Returns true if the battery is currently discharging.
    pub fn is_discharging(&self) -> bool {
        matches!(self, ChargeState::Discharging)
    }

    /// Parse the kernel `status` attribute value.
    pub fn from_sysfs(status: &str) -> Self {
        let status = status.trim();
        if status.eq_ignore_ascii_case("Charging") {
            ChargeState::Charging
        } else if status.eq_ignore_ascii_case("Discharging") {
            ChargeState::Discharging
        } else if status.eq_ignore_ascii_case("Not charging") {
            ChargeState::NotCharging
        } else if status.eq_ignore_ascii_case("Full") {
            ChargeState::Full
        } else {
            ChargeState::Unknown
        }
    }
}

impl fmt::Display for ChargeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<starship_battery::State> for ChargeState {
    fn from(state: starship_battery::State) -> Self {
        match state {
            starship_battery::State::Charging => ChargeState::Charging,
            starship_battery::State::Discharging => ChargeState::Discharging,
            starship_battery::State::Empty => ChargeState::Discharging,
            starship_battery::State::Full => ChargeState::Full,
            starship_battery::State::Unknown => ChargeState::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_state_labels() {
        assert_eq!(ChargeState::Charging.label(), "Charging");
        assert_eq!(ChargeState::Discharging.label(), "Discharging");
        assert_eq!(ChargeState::NotCharging.label(), "Not Charging");
        assert_eq!(ChargeState::Full.label(), "Full");
        assert_eq!(ChargeState::Unknown.label(), "Unknown");
    }

    #[test]
    fn test_charge_state_codes() {
        assert_eq!(ChargeState::Unknown.code(), 1);
        assert_eq!(ChargeState::Charging.code(), 2);
        assert_eq!(ChargeState::Discharging.code(), 3);
        assert_eq!(ChargeState::NotCharging.code(), 4);
        assert_eq!(ChargeState::Full.code(), 5);
    }

    #[test]
    fn test_charge_state_from_sysfs() {
        assert_eq!(ChargeState::from_sysfs("Charging\n"), ChargeState::Charging);
        assert_eq!(
            ChargeState::from_sysfs("Discharging"),
            ChargeState::Discharging
        );
        assert_eq!(
            ChargeState::from_sysfs("Not charging"),
            ChargeState::NotCharging
        );
        assert_eq!(ChargeState::from_sysfs("Full"), ChargeState::Full);
        assert_eq!(ChargeState::from_sysfs("garbage"), ChargeState::Unknown);
    }

    #[test]
    fn test_battery_state_conversion() {
        assert_eq!(
            ChargeState::from(starship_battery::State::Charging),
            ChargeState::Charging
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Discharging),
            ChargeState::Discharging
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Empty),
            ChargeState::Discharging
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Full),
            ChargeState::Full
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Unknown),
            ChargeState::Unknown
        );
    }
}
