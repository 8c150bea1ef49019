//! Module for runtime SIMD engine detection and management.
//!
//! The engine decides how many lanes a descriptor gets for a given element
//! type. Verification walks every engine up to the detected one, the same way
//! a multi-target build tests each compiled target.

use std::fmt;
use std::str::FromStr;

/// Available SIMD engine types based on CPU capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimdEngineType {
    /// Single-lane scalar target - always available
    Scalar,
    /// 128-bit SIMD (SSE/NEON) - always available
    Engine128,
    /// 256-bit SIMD (AVX2) - x86_64 only
    #[cfg(target_arch = "x86_64")]
    Engine256,
    /// 512-bit SIMD (AVX-512) - x86_64 only (requires avx512 feature flag)
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    Engine512,
}

impl SimdEngineType {
    /// Register width in bytes. The scalar engine has no register; it always
    /// yields one lane regardless of element size.
    pub fn vector_bytes(self) -> Option<usize> {
        match self {
            SimdEngineType::Scalar => None,
            SimdEngineType::Engine128 => Some(16),
            #[cfg(target_arch = "x86_64")]
            SimdEngineType::Engine256 => Some(32),
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdEngineType::Engine512 => Some(64),
        }
    }

    /// Lane count of a full vector of `lane_bytes`-wide elements.
    pub fn max_lanes(self, lane_bytes: usize) -> usize {
        match self.vector_bytes() {
            Some(bytes) => (bytes / lane_bytes).max(1),
            None => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SimdEngineType::Scalar => "scalar",
            SimdEngineType::Engine128 => "128",
            #[cfg(target_arch = "x86_64")]
            SimdEngineType::Engine256 => "256",
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdEngineType::Engine512 => "512",
        }
    }

    /// Stable ordinal used when deriving per-configuration seeds.
    pub fn ordinal(self) -> u64 {
        match self {
            SimdEngineType::Scalar => 0,
            SimdEngineType::Engine128 => 1,
            #[cfg(target_arch = "x86_64")]
            SimdEngineType::Engine256 => 2,
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdEngineType::Engine512 => 3,
        }
    }

    /// Every engine compiled into this build, narrowest first.
    pub fn all() -> Vec<SimdEngineType> {
        vec![
            SimdEngineType::Scalar,
            SimdEngineType::Engine128,
            #[cfg(target_arch = "x86_64")]
            SimdEngineType::Engine256,
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdEngineType::Engine512,
        ]
    }
}

impl fmt::Display for SimdEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimdEngineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimdEngineType::all()
            .into_iter()
            .find(|engine| engine.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = SimdEngineType::all().iter().map(|e| e.name()).collect();
                format!("unknown engine '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Detects the optimal SIMD engine based on CPU features
///
/// Environment variable overrides for testing/debugging:
/// - `FERROUS_SELECT_FORCE_SCALAR=1`: Force the single-lane engine
/// - `FERROUS_SELECT_FORCE_SSE=1`: Force SSE/128-bit engine (skip AVX2/AVX-512)
/// - `FERROUS_SELECT_FORCE_AVX2=1`: Force AVX2/256-bit engine (skip AVX-512)
pub fn detect_optimal_simd_engine() -> SimdEngineType {
    if env_flag("FERROUS_SELECT_FORCE_SCALAR") {
        log::info!("FERROUS_SELECT_FORCE_SCALAR=1: Using scalar (single-lane) engine");
        return SimdEngineType::Scalar;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if env_flag("FERROUS_SELECT_FORCE_SSE") {
            log::info!("FERROUS_SELECT_FORCE_SSE=1: Using SSE (128-bit) engine");
            return SimdEngineType::Engine128;
        }

        #[cfg(feature = "avx512")]
        {
            let force_avx2 = env_flag("FERROUS_SELECT_FORCE_AVX2");
            if !force_avx2 && is_x86_feature_detected!("avx512f") {
                return SimdEngineType::Engine512;
            }
            if force_avx2 {
                log::info!("FERROUS_SELECT_FORCE_AVX2=1: Using AVX2 (256-bit) engine");
            }
        }

        if is_x86_feature_detected!("avx2") {
            return SimdEngineType::Engine256;
        }

        SimdEngineType::Engine128
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        // aarch64 NEON and the portable fallback both run 128-bit chunks
        SimdEngineType::Engine128
    }
}

/// Every engine up to and including `engine`, narrowest first.
pub fn engines_up_to(engine: SimdEngineType) -> Vec<SimdEngineType> {
    SimdEngineType::all()
        .into_iter()
        .filter(|&e| e <= engine)
        .collect()
}

/// Returns a human-readable description of the SIMD engine
pub fn simd_engine_description(engine: SimdEngineType) -> &'static str {
    match engine {
        SimdEngineType::Scalar => "Scalar (single lane)",
        SimdEngineType::Engine128 => {
            #[cfg(target_arch = "x86_64")]
            {
                "SSE (128-bit, 16 x 8-bit lanes)"
            }
            #[cfg(target_arch = "aarch64")]
            {
                "NEON (128-bit, 16 x 8-bit lanes)"
            }
            #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
            {
                "Portable (128-bit, 16 x 8-bit lanes)"
            }
        }
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => "AVX2 (256-bit, 32 x 8-bit lanes)",
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => "AVX-512 (512-bit, 64 x 8-bit lanes)",
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test runtime SIMD engine detection
    #[test]
    fn test_simd_engine_detection() {
        let engine = detect_optimal_simd_engine();
        let description = simd_engine_description(engine);

        println!("Detected SIMD engine: {:?}", engine);
        println!("Description: {}", description);

        assert!(SimdEngineType::all().contains(&engine));
        assert!(engine.max_lanes(1) >= 1);
    }

    #[test]
    fn test_lane_counts_per_engine() {
        assert_eq!(SimdEngineType::Scalar.max_lanes(1), 1);
        assert_eq!(SimdEngineType::Scalar.max_lanes(8), 1);
        assert_eq!(SimdEngineType::Engine128.max_lanes(1), 16);
        assert_eq!(SimdEngineType::Engine128.max_lanes(8), 2);
        #[cfg(target_arch = "x86_64")]
        assert_eq!(SimdEngineType::Engine256.max_lanes(4), 8);
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        assert_eq!(SimdEngineType::Engine512.max_lanes(1), 64);
    }

    #[test]
    fn test_engines_up_to_is_ordered_prefix() {
        let engines = engines_up_to(SimdEngineType::Engine128);
        assert_eq!(engines, vec![SimdEngineType::Scalar, SimdEngineType::Engine128]);
        assert_eq!(engines_up_to(SimdEngineType::Scalar), vec![SimdEngineType::Scalar]);
        let all = SimdEngineType::all();
        assert_eq!(engines_up_to(*all.last().unwrap()), all);
    }

    #[test]
    fn test_engine_names_round_trip() {
        for engine in SimdEngineType::all() {
            assert_eq!(engine.name().parse::<SimdEngineType>(), Ok(engine));
        }
        assert!("1024".parse::<SimdEngineType>().is_err());
    }
}
