use std::path::{Path, PathBuf};

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("se", "krampus", "Krampus")
}

/// Hämta databassökväg
pub fn get_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("krampus.db"))
        .unwrap_or_else(|| PathBuf::from("krampus.db"))
}

/// Hämta konfigurationssökväg
pub fn get_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Normalisera sökväg för visning
pub fn display_path(path: &Path) -> String {
    // Förkorta hemkatalogen till ~
    if let Some(base) = directories::BaseDirs::new() {
        if let Ok(stripped) = path.strip_prefix(base.home_dir()) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_have_expected_file_names() {
        assert_eq!(
            get_database_path().file_name().and_then(|n| n.to_str()),
            Some("krampus.db")
        );
        assert_eq!(
            get_config_path().file_name().and_then(|n| n.to_str()),
            Some("config.toml")
        );
    }

    #[test]
    fn test_display_path_outside_home() {
        assert_eq!(display_path(Path::new("/tmp/krampus.db")), "/tmp/krampus.db");
    }
}
