//! Progress reporting shared by decompose, rebuild and export
//!
//! Long-running operations take an [`AtlasProgressCallback`] and call it once
//! per sprite or package file, so a front end can drive a progress bar.

/// Borrowed observer invoked with each [`AtlasProgress`] update.
pub type AtlasProgressCallback<'a> = &'a (dyn Fn(&AtlasProgress) + Sync + Send);

/// One step of a sprite or package operation.
#[derive(Debug, Clone)]
pub struct AtlasProgress {
    /// What the operation is doing right now
    pub phase: AtlasPhase,
    /// Step reached so far, counting from 1 (0 before the first step)
    pub current: usize,
    /// Steps in this phase, usually the sprite count
    pub total: usize,
    /// Sprite key or package file of this step
    pub current_item: Option<String>,
}

impl AtlasProgress {
    #[must_use]
    pub fn new(phase: AtlasPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: None,
        }
    }

    /// Update that names the sprite or file of this step
    #[must_use]
    pub fn with_item(
        phase: AtlasPhase,
        current: usize,
        total: usize,
        item: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: Some(item.into()),
        }
    }

    /// Fraction of the phase done, where an empty phase counts as finished
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Stage of a decompose, rebuild or export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasPhase {
    /// Loading the atlas image
    LoadingImage,
    /// Cropping and writing sprite files
    Extracting,
    /// Hashing sprite files against their baselines
    Scanning,
    /// Pasting sprites onto the canvas
    Compositing,
    /// Writing the package files
    Writing,
    /// Adding files to the zip archive
    Archiving,
    /// Every step finished
    Complete,
}

impl AtlasPhase {
    /// Label shown next to the progress bar
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadingImage => "Loading atlas image",
            Self::Extracting => "Extracting sprites",
            Self::Scanning => "Scanning for edits",
            Self::Compositing => "Compositing sprites",
            Self::Writing => "Writing package",
            Self::Archiving => "Archiving",
            Self::Complete => "Complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let quarter = AtlasProgress::new(AtlasPhase::Extracting, 1, 4);
        assert!((quarter.percentage() - 0.25).abs() < f32::EPSILON);

        let empty = AtlasProgress::new(AtlasPhase::Complete, 0, 0);
        assert!((empty.percentage() - 1.0).abs() < f32::EPSILON);
    }
}
