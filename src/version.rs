// Build information embedded by build.rs, shown by `--version-full`
// and logged once at startup.

use std::fmt;

/// Build metadata captured at compile time.
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_dirty: bool,
    pub build_date: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("BREATHEBREAK_VERSION"),
            git_hash: env!("BREATHEBREAK_GIT_HASH"),
            git_dirty: env!("BREATHEBREAK_GIT_DIRTY") == "true",
            build_date: env!("BREATHEBREAK_BUILD_DATE"),
            build_profile: env!("BREATHEBREAK_BUILD_PROFILE"),
        }
    }

    /// Version plus git hash, e.g. `v0.3.0 (1a2b3c4)`
    pub fn short(&self) -> String {
        let dirty = if self.git_dirty { "+dirty" } else { "" };
        format!("v{} ({}{})", self.version, self.git_hash, dirty)
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BreatheBreak v{}", self.version)?;
        writeln!(
            f,
            "Git: {}{}",
            self.git_hash,
            if self.git_dirty { " +uncommitted changes" } else { "" }
        )?;
        writeln!(f, "Built: {} ({})", self.build_date, self.build_profile)?;
        Ok(())
    }
}

/// Multi-line build description for `--version-full`
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}

/// One-line version for log output
pub fn short_version() -> String {
    BuildInfo::current().short()
}
