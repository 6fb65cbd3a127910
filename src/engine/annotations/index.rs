use bevy::prelude::*;
use std::collections::HashMap;

use crate::constants::MARKER_PREFIX;

/// One logical annotation: the marker node plus everything below it,
/// identified by the marker's name.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub id: String,
    pub marker: Entity,
}

/// Ordered id -> marker lookup, built once after the scene finishes
/// spawning and read-only afterwards.
#[derive(Resource, Default)]
pub struct AnnotationIndex {
    entries: Vec<Annotation>,
    by_id: HashMap<String, usize>,
    built: bool,
}

impl AnnotationIndex {
    pub fn publish(&mut self, entries: Vec<Annotation>) {
        self.by_id = entries
            .iter()
            .enumerate()
            .map(|(slot, annotation)| (annotation.id.clone(), slot))
            .collect();
        self.entries = entries;
        self.built = true;
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.by_id.get(id).map(|&slot| &self.entries[slot])
    }
}

/// Tests whether a node name carries the annotation marker sentinel.
pub fn is_marker_name(name: &str) -> bool {
    name.starts_with(MARKER_PREFIX)
}

/// Collects every marker node below `root`, in hierarchy iteration order.
///
/// Discovery is deep: every descendant is tested, so markers nested under
/// grouping nodes are found too. The scene graph is only read.
pub fn collect_annotations(
    root: Entity,
    names: &Query<&Name>,
    children: &Query<&Children>,
) -> Vec<Annotation> {
    children
        .iter_descendants(root)
        .filter_map(|entity| {
            let name = names.get(entity).ok()?;
            is_marker_name(name.as_str()).then(|| Annotation {
                id: name.as_str().to_owned(),
                marker: entity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    fn spawn_tree(world: &mut World) -> Entity {
        let root = world.spawn(Name::new("Scene")).id();
        let group = world.spawn((Name::new("Burner_Group"), ChildOf(root))).id();
        world.spawn((Name::new("!Burner"), ChildOf(group)));
        world.spawn((Name::new("Housing"), ChildOf(group)));
        world.spawn((Name::new("!Valve"), ChildOf(root)));
        root
    }

    fn collect_ids(world: &mut World, root: Entity) -> Vec<String> {
        let mut state: SystemState<(Query<&Name>, Query<&Children>)> = SystemState::new(world);
        let (names, children) = state.get(world);
        collect_annotations(root, &names, &children)
            .into_iter()
            .map(|annotation| annotation.id)
            .collect()
    }

    #[test]
    fn discovery_is_deep() {
        let mut world = World::new();
        let root = spawn_tree(&mut world);
        let ids = collect_ids(&mut world, root);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"!Burner".to_owned()));
        assert!(ids.contains(&"!Valve".to_owned()));
    }

    #[test]
    fn discovery_is_deterministic() {
        let mut world = World::new();
        let root = spawn_tree(&mut world);
        let first = collect_ids(&mut world, root);
        let second = collect_ids(&mut world, root);
        assert_eq!(first, second);
    }

    #[test]
    fn index_lookup_by_id() {
        let mut world = World::new();
        let root = spawn_tree(&mut world);
        let mut state: SystemState<(Query<&Name>, Query<&Children>)> =
            SystemState::new(&mut world);
        let (names, children) = state.get(&world);
        let entries = collect_annotations(root, &names, &children);

        let mut index = AnnotationIndex::default();
        assert!(!index.is_built());
        index.publish(entries);
        assert!(index.is_built());
        assert_eq!(index.len(), 2);
        assert!(index.get("!Valve").is_some());
        assert!(index.get("Housing").is_none());
    }

    #[test]
    fn empty_scene_builds_empty_index() {
        let mut world = World::new();
        let root = world.spawn(Name::new("Scene")).id();
        let ids = collect_ids(&mut world, root);
        assert!(ids.is_empty());

        let mut index = AnnotationIndex::default();
        index.publish(Vec::new());
        assert!(index.is_built());
        assert!(index.is_empty());
    }
}
