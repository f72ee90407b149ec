//! Compile-time platform gate and export/import linkage selection.
//!
//! The engine supports exactly one platform identifier, [`PlatformId::Desktop`].
//! Building for anything else is rejected before any code is generated.

use std::fmt;

use thiserror::Error;

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
compile_error!("Native Engine only supports desktop platforms (windows, linux, macos).");

/// Visibility applied to the engine's public symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    /// The engine itself is being built; symbols are exported.
    Export,
    /// A consumer is being built against the engine; symbols are imported.
    Import,
}

impl Linkage {
    pub const fn is_export(self) -> bool {
        matches!(self, Linkage::Export)
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Linkage::Export => f.write_str("export"),
            Linkage::Import => f.write_str("import"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformId {
    Desktop,
    Unsupported(&'static str),
}

impl PlatformId {
    /// Identifier of the target this crate is being compiled for.
    pub const CURRENT: PlatformId = PlatformId::from_target_os(std::env::consts::OS);

    pub const fn from_target_os(os: &'static str) -> PlatformId {
        match os.as_bytes() {
            b"windows" | b"linux" | b"macos" => PlatformId::Desktop,
            _ => PlatformId::Unsupported(os),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Native Engine only supports desktop platforms (windows, linux, macos), got `{platform}`")]
pub struct UnsupportedPlatform {
    pub platform: &'static str,
}

/// Picks the linkage for `platform`, exporting when `building_library` is set.
pub const fn resolve(
    platform: PlatformId,
    building_library: bool,
) -> Result<Linkage, UnsupportedPlatform> {
    match platform {
        PlatformId::Desktop if building_library => Ok(Linkage::Export),
        PlatformId::Desktop => Ok(Linkage::Import),
        PlatformId::Unsupported(platform) => Err(UnsupportedPlatform { platform }),
    }
}

/// Linkage of this build. Evaluated at compile time, so an unsupported target
/// fails the build here as well.
pub const LINKAGE: Linkage = match resolve(PlatformId::CURRENT, cfg!(feature = "build-dll")) {
    Ok(linkage) => linkage,
    Err(_) => panic!("Native Engine only supports desktop platforms (windows, linux, macos)."),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_with_build_flag_exports() {
        assert_eq!(resolve(PlatformId::Desktop, true), Ok(Linkage::Export));
    }

    #[test]
    fn desktop_without_build_flag_imports() {
        assert_eq!(resolve(PlatformId::Desktop, false), Ok(Linkage::Import));
    }

    #[test]
    fn other_platforms_are_rejected_regardless_of_flag() {
        for os in ["android", "ios", "freebsd", "wasm", ""] {
            let platform = PlatformId::from_target_os(os);
            assert_eq!(platform, PlatformId::Unsupported(os));
            for building_library in [true, false] {
                let err = resolve(platform, building_library).unwrap_err();
                assert_eq!(err.platform, os);
            }
        }
    }

    #[test]
    fn desktop_targets_map_to_the_supported_identifier() {
        for os in ["windows", "linux", "macos"] {
            assert_eq!(PlatformId::from_target_os(os), PlatformId::Desktop);
        }
        assert_eq!(PlatformId::CURRENT, PlatformId::Desktop);
    }

    #[test]
    fn build_linkage_follows_feature_flag() {
        assert_eq!(LINKAGE.is_export(), cfg!(feature = "build-dll"));
    }

    #[test]
    fn linkage_display() {
        assert_eq!(Linkage::Export.to_string(), "export");
        assert_eq!(Linkage::Import.to_string(), "import");
    }

    #[test]
    fn unsupported_error_names_platform() {
        let err = UnsupportedPlatform { platform: "android" };
        assert!(err.to_string().ends_with("got `android`"));
    }
}
