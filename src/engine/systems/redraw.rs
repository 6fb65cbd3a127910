use bevy::prelude::*;
use bevy::window::RequestRedraw;

/// Frame-level "something changed" accumulator. Camera advancement,
/// billboard orientation, visibility toggles and the info panel all mark
/// it; the end of the update chain flushes it into a winit redraw request.
/// Under the reactive event loop this keeps the app redrawing only while
/// there is motion to show.
#[derive(Resource, Default)]
pub struct RedrawFlag {
    needed: bool,
}

impl RedrawFlag {
    pub fn request(&mut self) {
        self.needed = true;
    }

    pub fn is_needed(&self) -> bool {
        self.needed
    }

    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.needed)
    }
}

pub fn flush_redraw(mut redraw: ResMut<RedrawFlag>, mut requests: EventWriter<RequestRedraw>) {
    if redraw.take() {
        requests.write(RequestRedraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_emits_once_and_clears() {
        let mut app = App::new();
        app.add_event::<RequestRedraw>();
        app.init_resource::<RedrawFlag>();
        app.add_systems(Update, flush_redraw);

        app.world_mut().resource_mut::<RedrawFlag>().request();
        app.update();

        assert!(!app.world().resource::<RedrawFlag>().is_needed());
        let events = app.world().resource::<Events<RequestRedraw>>();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn no_request_means_no_redraw_event() {
        let mut app = App::new();
        app.add_event::<RequestRedraw>();
        app.init_resource::<RedrawFlag>();
        app.add_systems(Update, flush_redraw);

        app.update();
        assert!(app.world().resource::<Events<RequestRedraw>>().is_empty());
    }
}
