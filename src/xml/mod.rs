//! Loading an audio policy configuration document.
//!
//! ```xml
//! <audioPolicyConfiguration version="1.0" xmlns:xi="http://www.w3.org/2001/XInclude">
//!     <globalConfiguration speaker_drc_enabled="true"/>
//!     <modules>
//!         <module name="primary" halVersion="3.0">...</module>
//!         <xi:include href="a2dp_audio_policy_configuration.xml"/>
//!     </modules>
//!     <surroundSound>...</surroundSound>
//! </audioPolicyConfiguration>
//! ```

pub mod deserialize;
pub mod errors;
pub mod quick;

pub use deserialize::DeserializeError;
pub use errors::{ConfigError, ErrorContext};

use std::fs;
use std::path::{Path, PathBuf};

use crate::context::{LoadContext, LoadOptions};
use crate::model::AudioPolicyConfig;
use crate::xml::deserialize::{
    ModuleSchema, deserialize_collection, deserialize_global_config, deserialize_surround_sound,
};
use crate::xml::quick::{XmlElement, expand_includes, parse_document};

pub const ROOT_TAG: &str = "audioPolicyConfiguration";
pub const VERSION_ATTR: &str = "version";
/// The only document version this loader accepts.
pub const SUPPORTED_VERSION: &str = "1.0";

/// Builder for configuration loads.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    options: LoadOptions,
    first_gain_index: u32,
    base_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Number gains from `index`, e.g. a previous load's
    /// [`AudioPolicyConfig::next_gain_index`].
    pub fn first_gain_index(mut self, index: u32) -> Self {
        self.first_gain_index = index;
        self
    }

    /// Directory includes of an in-memory document are resolved against.
    /// Defaults to the current directory.
    pub fn base_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Load the document at `path`; includes resolve next to it.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<AudioPolicyConfig, ConfigError> {
        let path = path.as_ref();
        let context = ErrorContext::with_file_path(path);
        log::debug!("Loading {}", path.display());

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            context: context.clone(),
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        self.load(&text, base_dir, Some(path.to_path_buf()), context)
    }

    /// Load an in-memory document.
    pub fn load_str(&self, xml: &str) -> Result<AudioPolicyConfig, ConfigError> {
        let base_dir = self.base_dir.as_deref().unwrap_or_else(|| Path::new("."));
        self.load(xml, base_dir, None, ErrorContext::new())
    }

    fn load(
        &self,
        xml: &str,
        base_dir: &Path,
        source: Option<PathBuf>,
        context: ErrorContext,
    ) -> Result<AudioPolicyConfig, ConfigError> {
        let result = parse_document(xml)
            .map_err(|e| ConfigError::from_document(e, context.clone()))
            .and_then(|mut root| {
                let included = expand_includes(&mut root, base_dir);
                if included > 0 {
                    log::debug!("Resolved {} include(s)", included);
                }
                let mut ctx = LoadContext::with_gain_index(self.options, self.first_gain_index);
                load_document(&root, source, &mut ctx, &context)
            });
        if let Err(ref e) = result {
            log::error!("Rejected audio policy configuration: {}", e);
        }
        result
    }
}

/// Check the root element and build the configuration from it.
fn load_document(
    root: &XmlElement,
    source: Option<PathBuf>,
    ctx: &mut LoadContext,
    context: &ErrorContext,
) -> Result<AudioPolicyConfig, ConfigError> {
    let root_context = || context.clone().with_parsing(format!("<{}>", root.name()));

    if root.name() != ROOT_TAG {
        return Err(ConfigError::Structure {
            message: format!("expected root element <{}>", ROOT_TAG),
            context: root_context(),
        });
    }
    let version = root
        .attrs()
        .get_non_empty(VERSION_ATTR)
        .ok_or_else(|| ConfigError::Structure {
            message: format!("no {} attribute on the root element", VERSION_ATTR),
            context: root_context(),
        })?;
    if version != SUPPORTED_VERSION {
        return Err(ConfigError::VersionMismatch {
            expected: SUPPORTED_VERSION.to_string(),
            found: version.to_string(),
            context: root_context(),
        });
    }

    let mut config = AudioPolicyConfig::new(source);

    let modules = deserialize_collection(&ModuleSchema, root, &mut config.modules, ctx)
        .map_err(|source| ConfigError::Deserialize {
            source,
            context: context.clone().with_parsing("<modules>"),
        })?;
    log::debug!("Loaded {} module(s)", modules);

    deserialize_global_config(root, &mut config.global);
    deserialize_surround_sound(root, &mut config.surround_formats, ctx).map_err(|source| {
        ConfigError::Deserialize {
            source,
            context: context.clone().with_parsing("<surroundSound>"),
        }
    })?;

    config.next_gain_index = ctx.peek_gain_index();
    Ok(config)
}

impl AudioPolicyConfig {
    /// Load the configuration file at `path`.
    pub fn load<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self, ConfigError> {
        ConfigLoader::new(options).load_file(path)
    }

    /// Load a configuration from an in-memory document. Includes are
    /// resolved against the current directory.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &str, options: LoadOptions) -> Result<Self, ConfigError> {
        ConfigLoader::new(options).load_str(xml)
    }
}
