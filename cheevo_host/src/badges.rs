use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use cheevo_popup::{TextureHandle, TextureManager, WidgetIcon};
use serde::Serialize;
use walkdir::WalkDir;

/// Handles below this are reserved for the widget's built-in icons.
const FIRST_BADGE_HANDLE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBadge {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BadgeStats {
    pub indexed: usize,
    pub loaded: usize,
    pub missing: usize,
    pub unloaded: usize,
    pub resident: usize,
}

#[derive(Debug, Default)]
struct Residency {
    resident: HashMap<u64, LoadedBadge>,
    loaded: usize,
    missing: usize,
    unloaded: usize,
}

/// PNG badges indexed by file stem, handed out as texture handles.
///
/// Loading only reads the image header; the headless host never uploads
/// pixels, but it does track which handles are still resident so a run can
/// prove every badge it handed out came back.
#[derive(Debug)]
pub struct BadgeCache {
    index: HashMap<String, PathBuf>,
    residency: Mutex<Residency>,
    next_handle: AtomicU64,
}

impl Default for BadgeCache {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            residency: Mutex::default(),
            next_handle: AtomicU64::new(FIRST_BADGE_HANDLE),
        }
    }
}

impl BadgeCache {
    pub fn from_root(root: &Path) -> Result<Self> {
        let mut cache = BadgeCache::default();
        if !root.exists() {
            log::warn!(
                "[cheevo_host] badge directory {} does not exist",
                root.display()
            );
            return Ok(cache);
        }
        for entry in WalkDir::new(root).into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!(
                        "[cheevo_host] failed to traverse {}: {err}",
                        root.display()
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_png = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if !is_png {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                cache
                    .index
                    .entry(stem.to_ascii_lowercase())
                    .or_insert_with(|| path.to_path_buf());
            }
        }
        log::debug!(
            "[cheevo_host] indexed {} badges under {}",
            cache.index.len(),
            root.display()
        );
        Ok(cache)
    }

    fn residency(&self) -> MutexGuard<'_, Residency> {
        self.residency
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn resolve(&self, badge: &str) -> Option<&Path> {
        self.index
            .get(&badge.to_ascii_lowercase())
            .map(PathBuf::as_path)
    }

    pub fn stats(&self) -> BadgeStats {
        let residency = self.residency();
        BadgeStats {
            indexed: self.index.len(),
            loaded: residency.loaded,
            missing: residency.missing,
            unloaded: residency.unloaded,
            resident: residency.resident.len(),
        }
    }
}

impl TextureManager for BadgeCache {
    fn badge_texture(&self, badge: &str) -> Option<TextureHandle> {
        let Some(path) = self.resolve(badge) else {
            log::debug!("[cheevo_host] no badge image for {badge:?}");
            self.residency().missing += 1;
            return None;
        };
        let (width, height) = match image::image_dimensions(path) {
            Ok(dims) => dims,
            Err(err) => {
                log::warn!(
                    "[cheevo_host] failed to load badge {}: {err}",
                    path.display()
                );
                self.residency().missing += 1;
                return None;
            }
        };
        let handle = TextureHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed))?;
        let mut residency = self.residency();
        residency.loaded += 1;
        residency.resident.insert(
            handle.get(),
            LoadedBadge {
                name: badge.to_string(),
                width,
                height,
            },
        );
        Some(handle)
    }

    fn unload(&self, handle: TextureHandle) {
        let mut residency = self.residency();
        if let Some(badge) = residency.resident.remove(&handle.get()) {
            residency.unloaded += 1;
            log::debug!(
                "[cheevo_host] unloaded badge {:?} ({}x{})",
                badge.name,
                badge.width,
                badge.height
            );
        } else {
            log::warn!(
                "[cheevo_host] unload of unknown texture {}",
                handle.get()
            );
        }
    }

    fn icon(&self, icon: WidgetIcon) -> Option<TextureHandle> {
        let raw = match icon {
            WidgetIcon::Background => 1,
            WidgetIcon::LeftEdge => 2,
            WidgetIcon::RightEdge => 3,
            WidgetIcon::Achievement => 4,
        };
        TextureHandle::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use tempfile::tempdir;

    fn write_png(path: &Path, size: u32) {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(size, size, Rgba([255, 200, 0, 255]));
        img.save(path).expect("write png");
    }

    #[test]
    fn badges_resolve_by_stem_and_track_residency() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("set");
        std::fs::create_dir_all(&nested).expect("mkdir");
        write_png(&nested.join("Speedrun.png"), 64);
        std::fs::write(dir.path().join("notes.txt"), "not a badge").expect("write");

        let cache = BadgeCache::from_root(dir.path()).expect("index");
        assert_eq!(cache.stats().indexed, 1);

        let handle = cache.badge_texture("speedrun").expect("badge handle");
        assert!(handle.get() >= FIRST_BADGE_HANDLE);
        let badge = cache
            .residency()
            .resident
            .get(&handle.get())
            .cloned()
            .expect("resident");
        assert_eq!((badge.width, badge.height), (64, 64));

        assert!(cache.badge_texture("notes").is_none());
        cache.unload(handle);
        assert_eq!(
            cache.stats(),
            BadgeStats {
                indexed: 1,
                loaded: 1,
                missing: 1,
                unloaded: 1,
                resident: 0,
            }
        );
    }

    #[test]
    fn icons_never_collide_with_badges() {
        let cache = BadgeCache::default();
        for icon in [
            WidgetIcon::Background,
            WidgetIcon::LeftEdge,
            WidgetIcon::RightEdge,
            WidgetIcon::Achievement,
        ] {
            let handle = cache.icon(icon).expect("icon handle");
            assert!(handle.get() < FIRST_BADGE_HANDLE);
        }
    }

    #[test]
    fn missing_root_yields_empty_cache() {
        let dir = tempdir().expect("tempdir");
        let cache = BadgeCache::from_root(&dir.path().join("absent")).expect("index");
        assert_eq!(cache.stats().indexed, 0);
    }
}
