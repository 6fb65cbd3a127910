use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

use crate::constants::{FALLBACK_INFO, INFO_ASSET_PATH, MARKER_PREFIX};

/// Raw annotation-info table as authored on disk: marker id to HTML-ish
/// body text. Loaded through the asset server so startup never blocks.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct InfoContentSource(pub HashMap<String, String>);

/// Tracks the in-flight asset handle until the table is published.
#[derive(Resource, Default)]
pub struct InfoContentLoader {
    pub handle: Handle<InfoContentSource>,
    pub published: bool,
}

/// Published marker-id -> body lookup. Selections that arrive before the
/// table is ready, or that name an unknown id, resolve to the fallback.
#[derive(Resource, Default)]
pub struct InfoContent {
    sections: HashMap<String, String>,
    ready: bool,
}

impl InfoContent {
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn resolve(&self, id: &str) -> &str {
        self.sections.get(id).map_or(FALLBACK_INFO, String::as_str)
    }

    /// Keeps only marker-keyed sections; anything else in the file is
    /// authoring noise.
    pub fn publish(&mut self, source: &InfoContentSource) {
        self.sections = source
            .0
            .iter()
            .filter(|(id, _)| id.starts_with(MARKER_PREFIX))
            .map(|(id, body)| (id.clone(), body.clone()))
            .collect();
        self.ready = true;
    }
}

pub fn load_info_content(asset_server: Res<AssetServer>, mut loader: ResMut<InfoContentLoader>) {
    loader.handle = asset_server.load(INFO_ASSET_PATH);
    info!("loading annotation info from {INFO_ASSET_PATH}");
}

/// Polls the asset until it arrives, then publishes the lookup table once.
pub fn publish_info_content(
    sources: Res<Assets<InfoContentSource>>,
    mut loader: ResMut<InfoContentLoader>,
    mut content: ResMut<InfoContent>,
) {
    if loader.published {
        return;
    }
    let Some(source) = sources.get(&loader.handle) else {
        return;
    };
    content.publish(source);
    loader.published = true;
    info!("annotation info ready, {} sections", content.sections.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> InfoContentSource {
        InfoContentSource(
            pairs
                .iter()
                .map(|(id, body)| ((*id).to_owned(), (*body).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn unready_table_resolves_to_fallback() {
        let content = InfoContent::default();
        assert!(!content.is_ready());
        assert_eq!(content.resolve("!Burner"), FALLBACK_INFO);
    }

    #[test]
    fn published_sections_resolve_verbatim() {
        let mut content = InfoContent::default();
        content.publish(&source(&[("!Burner", "<h3>Burner</h3><p>Main burner.</p>")]));
        assert!(content.is_ready());
        assert_eq!(content.resolve("!Burner"), "<h3>Burner</h3><p>Main burner.</p>");
    }

    #[test]
    fn unknown_id_resolves_to_fallback() {
        let mut content = InfoContent::default();
        content.publish(&source(&[("!Burner", "body")]));
        assert_eq!(content.resolve("!Valve"), FALLBACK_INFO);
    }

    #[test]
    fn non_marker_keys_are_dropped() {
        let mut content = InfoContent::default();
        content.publish(&source(&[("!Burner", "body"), ("notes", "authoring scratch")]));
        assert_eq!(content.resolve("notes"), FALLBACK_INFO);
        assert_eq!(content.resolve("!Burner"), "body");
    }

    #[test]
    fn source_deserialises_from_json() {
        let raw = r##"{"!Burner": "<h3>Burner</h3>", "!Valve": "<h3>Valve</h3>"}"##;
        let parsed: InfoContentSource = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.0.len(), 2);
        assert_eq!(parsed.0["!Valve"], "<h3>Valve</h3>");
    }
}
