//! Basic flight control inputs expressed as a fixed set of DREF writes.

/// Lateral pilot input (yoke roll), −1..=1.
pub const DREF_YOKE_ROLL: &str = "sim/cockpit2/controls/yoke_roll_ratio";
/// Longitudinal pilot input (yoke pitch), −1..=1.
pub const DREF_YOKE_PITCH: &str = "sim/cockpit2/controls/yoke_pitch_ratio";
/// Rudder pilot input, −1..=1.
pub const DREF_YOKE_HEADING: &str = "sim/cockpit2/controls/yoke_heading_ratio";
/// Throttle, −1..=1 (negative is reverse thrust).
pub const DREF_THROTTLE: &str = "sim/cockpit2/engine/actuators/throttle_jet_rev_ratio_all";
/// Gear handle, 0 up / 1 down.
pub const DREF_GEAR_HANDLE: &str = "sim/cockpit/switches/gear_handle_status";
/// Flap handle, 0..=1.
pub const DREF_FLAPS: &str = "sim/cockpit2/controls/flap_ratio";
/// Speedbrake, −0.5 armed, 0 retracted, 1 deployed.
pub const DREF_SPEEDBRAKE: &str = "sim/cockpit2/controls/speedbrake_ratio";
/// Parking brake ratio, 0..=1.
pub const DREF_PARK_BRAKE: &str = "sim/cockpit2/controls/parking_brake_ratio";

/// One complete set of basic control positions for the user aircraft.
///
/// Hundreds of finer-grained controls exist as individual datarefs; this
/// covers the primary surfaces and is applied as eight independent DREF
/// writes in a fixed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSurfaces {
    /// Yoke rotation / side-stick left-right, −1..=1.
    pub lateral: f32,
    /// Yoke or side-stick forward-backward, −1..=1.
    pub longitudinal: f32,
    /// Rudder input, −1..=1.
    pub rudder: f32,
    /// Throttle, −1 full reverse to 1 full forward.
    pub throttle: f32,
    /// Landing gear handle down.
    pub gear_down: bool,
    /// Requested flap position, 0..=1.
    pub flaps: f32,
    /// Speedbrake position: −0.5 armed, 0 retracted, 1 fully deployed.
    pub speedbrakes: f32,
    /// Parking brake ratio, 0..=1.
    pub park_brake: f32,
}

impl ControlSurfaces {
    /// Neutral surfaces: gear down, everything else centered or released.
    pub fn neutral() -> Self {
        Self {
            lateral: 0.0,
            longitudinal: 0.0,
            rudder: 0.0,
            throttle: 0.0,
            gear_down: true,
            flaps: 0.0,
            speedbrakes: 0.0,
            park_brake: 0.0,
        }
    }

    /// The (dataref, value) writes this set expands to, in wire order.
    pub fn wire_writes(self) -> [(&'static str, f32); 8] {
        [
            (DREF_YOKE_ROLL, self.lateral),
            (DREF_YOKE_PITCH, self.longitudinal),
            (DREF_YOKE_HEADING, self.rudder),
            (DREF_THROTTLE, self.throttle),
            (DREF_GEAR_HANDLE, if self.gear_down { 1.0 } else { 0.0 }),
            (DREF_FLAPS, self.flaps),
            (DREF_SPEEDBRAKE, self.speedbrakes),
            (DREF_PARK_BRAKE, self.park_brake),
        ]
    }
}

impl Default for ControlSurfaces {
    fn default() -> Self {
        Self::neutral()
    }
}
