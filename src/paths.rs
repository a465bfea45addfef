//! Location of the ModPlan data directory (config, logs)

use std::path::PathBuf;
use std::sync::LazyLock;

/// Set to keep ModPlan's data under the XDG config directory
pub const XDG_ENV_VAR: &str = "MODPLAN_XDG_PATH";

const DATA_DIR_NAME: &str = "ModPlan";

pub static DEFAULT_MODPLAN_PATH: LazyLock<PathBuf> = LazyLock::new(|| {
    data_dir(
        std::env::var_os(XDG_ENV_VAR).is_some(),
        dirs::home_dir(),
        dirs::config_dir(),
    )
});

/// `~/ModPlan`, or `$XDG_CONFIG_HOME/ModPlan` (`~/.config/ModPlan`) in XDG mode.
///
/// Without a home directory the path is relative to the working directory.
fn data_dir(xdg: bool, home: Option<PathBuf>, config: Option<PathBuf>) -> PathBuf {
    let base = if xdg {
        config.or_else(|| home.map(|home| home.join(".config")))
    } else {
        home
    };
    base.unwrap_or_default().join(DATA_DIR_NAME)
}

/// Computes a path inside the ModPlan data directory.
///
/// With no arguments this is the data directory itself (a `&Path`); otherwise
/// every argument is joined onto it in order, giving a `PathBuf`.
///
/// # Examples
///
/// ```
/// use modplan::modplan_path;
///
/// assert!(modplan_path!().ends_with("ModPlan"));
/// assert!(modplan_path!("logs").ends_with("ModPlan/logs"));
/// ```
#[macro_export]
macro_rules! modplan_path {
    () => {
        $crate::paths::DEFAULT_MODPLAN_PATH.as_path()
    };

    ( $( $path:expr ),+ $(,)? ) => {
        [
            $crate::paths::DEFAULT_MODPLAN_PATH.as_path(),
            $( std::path::Path::new(&$path) ),+
        ].into_iter().collect::<std::path::PathBuf>()
    };
}
