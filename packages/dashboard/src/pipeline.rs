//! Stateful view pipeline: state changed, views recomputed, observers
//! notified.

use std::sync::Arc;

use crash_map_crash_models::FilterState;
use crash_map_geography::WardSelection;
use crash_map_geography_models::{Frame, LatLng, MapView};
use crash_map_render::{BoundaryLayer, Cluster, boundary_layer, focus_view, grid_clusters};

use crate::{DerivedViews, LoadedData, Settings, compute_views};

/// Receives freshly computed views after every state change.
pub trait ViewObserver: Send + Sync {
    /// Called once per state change with the new views.
    fn views_changed(&self, views: &DerivedViews);
}

/// The current filter state, its views, and who to tell when they change.
pub struct Dashboard {
    data: Arc<LoadedData>,
    settings: Settings,
    state: FilterState,
    views: DerivedViews,
    observers: Vec<Arc<dyn ViewObserver>>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Starts from [`Dashboard::initial_state`] and computes the first
    /// views.
    #[must_use]
    pub fn new(data: Arc<LoadedData>, settings: Settings) -> Self {
        let state = Self::initial_state(&data);
        let views = compute_views(&data, &state, &settings);

        Self {
            data,
            settings,
            state,
            views,
            observers: Vec::new(),
        }
    }

    /// Default controls: the default year when the data has it, everything
    /// else unset.
    #[must_use]
    pub fn initial_state(data: &LoadedData) -> FilterState {
        FilterState::default().with_year(data.working_set.default_year())
    }

    /// Registers an observer. It is not called until the next change.
    pub fn subscribe(&mut self, observer: Arc<dyn ViewObserver>) {
        self.observers.push(observer);
    }

    /// Loaded inputs.
    #[must_use]
    pub fn data(&self) -> &LoadedData {
        &self.data
    }

    /// Current filter state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Views for the current state.
    #[must_use]
    pub const fn views(&self) -> &DerivedViews {
        &self.views
    }

    /// Replaces the filter state, recomputes every view and notifies
    /// observers. Every call recomputes, even if `state` is unchanged.
    pub fn apply(&mut self, state: FilterState) -> &DerivedViews {
        log::debug!("Applying filter state {state:?}");
        self.views = compute_views(&self.data, &state, &self.settings);
        self.state = state;

        for observer in &self.observers {
            observer.views_changed(&self.views);
        }

        &self.views
    }

    /// Selects the ward under `point` as the ward filter.
    ///
    /// Returns the new ward and how the map should re-frame, or `None`
    /// (state unchanged) when no identified ward is under the point.
    pub fn select_ward_at(&mut self, point: LatLng) -> Option<WardSelection> {
        let selection = self.data.boundaries.select_at(point)?;
        self.apply_selection(&selection);
        Some(selection)
    }

    /// Selects a ward by identifier. `click` is used as the centre when
    /// the ward has no extent.
    pub fn select_ward(&mut self, ward: &str, click: Option<LatLng>) -> Option<WardSelection> {
        let selection = self.data.boundaries.select_ward(ward, click)?;
        self.apply_selection(&selection);
        Some(selection)
    }

    /// Removes the ward filter.
    pub fn clear_ward(&mut self) -> &DerivedViews {
        let state = self.state.clone().with_ward(None::<String>);
        self.apply(state)
    }

    /// Close-up view for a selected marker.
    #[must_use]
    pub const fn focus(&self, point: LatLng) -> MapView {
        focus_view(point, self.settings.focus_zoom)
    }

    /// The view the reset control returns to.
    #[must_use]
    pub const fn reset_view(&self) -> Frame {
        Frame::View {
            view: self.settings.original_view,
        }
    }

    /// Ward polygon layer with the current ward marked.
    #[must_use]
    pub fn boundary_layer(&self) -> BoundaryLayer {
        boundary_layer(&self.data.boundaries, self.state.ward.as_deref())
    }

    /// Grid clusters of the current markers at `zoom`.
    #[must_use]
    pub fn clusters(&self, zoom: u8) -> Vec<Cluster> {
        grid_clusters(
            self.views.markers.positions(),
            zoom,
            self.settings.markers.cluster_radius,
        )
    }

    fn apply_selection(&mut self, selection: &WardSelection) {
        log::info!("Selected ward {}", selection.ward);
        let state = self.state.clone().with_ward(Some(selection.ward.clone()));
        self.apply(state);
    }
}
