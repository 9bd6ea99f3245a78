//! Aircraft pose types carried by the RPOS and VEHS packets.

/// One decoded RPOS reply: position, attitude, and kinematic rates of the
/// user aircraft.
///
/// Latitude, longitude, and elevation arrive as `f64` on the wire (needed
/// for precise placement); everything else is single precision. Velocities
/// are in the OpenGL world frame X-Plane uses: x east, y up, z south.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseSnapshot {
    /// Latitude in degrees.
    pub latitude_deg: f64,
    /// Longitude in degrees.
    pub longitude_deg: f64,
    /// Elevation above mean sea level in meters.
    pub elevation_msl_m: f64,
    /// Height above the terrain in meters.
    pub height_agl_m: f32,
    /// Roll angle in degrees.
    pub roll_deg: f32,
    /// Pitch angle in degrees.
    pub pitch_deg: f32,
    /// True (not magnetic) heading in degrees.
    pub true_heading_deg: f32,
    /// Velocity east in m/s.
    pub vx_mps: f32,
    /// Velocity up in m/s.
    pub vy_mps: f32,
    /// Velocity south in m/s.
    pub vz_mps: f32,
    /// Roll rate in rad/s.
    pub roll_rate_rps: f32,
    /// Pitch rate in rad/s.
    pub pitch_rate_rps: f32,
    /// Yaw rate in rad/s.
    pub yaw_rate_rps: f32,
}

/// A pose to inject via VEHS: position plus attitude, no rates.
///
/// This is the only way to move an aircraft in latitude/longitude; those
/// datarefs are read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseCommand {
    /// Latitude in degrees (double precision for exact placement).
    pub latitude_deg: f64,
    /// Longitude in degrees.
    pub longitude_deg: f64,
    /// Elevation above mean sea level in meters.
    pub elevation_msl_m: f64,
    /// Pitch angle in degrees.
    pub pitch_deg: f32,
    /// Roll angle in degrees.
    pub roll_deg: f32,
    /// True heading in degrees.
    pub true_heading_deg: f32,
}
