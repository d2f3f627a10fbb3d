use crate::angle;
use crate::category::{Category, CategoryId};
use crate::center::{CenterContent, CenterFrame, CenterSnapshot, CenterView};
use crate::geometry::{self, Point, RingLayout, Wedge};
use crate::labels::{self, SegmentLabel, ValueFormatter};
use crate::motion::{AnimatedValue, MotionPolicy, PopPulse, TransitionKind};
use crate::rotation::RotationController;
use crate::state::{ChartState, Selection};
use crate::DEFAULT_ALIGNMENT_ANGLE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Side of the square drawing area.
    pub size: f64,
    pub reduced_motion: bool,
    /// Screen angle (radians, y down) the selected segment rotates to.
    pub alignment_angle: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            size: 320.0,
            reduced_motion: false,
            alignment_angle: DEFAULT_ALIGNMENT_ANGLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    SelectionChanged(Category),
    CategoriesReplaced { previous_count: usize, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ChartEvent)>;

/// The chart engine as a host sees it.
///
/// Mutations go through [`select`](Self::select), [`tap`](Self::tap) and
/// [`replace_categories`](Self::replace_categories). Each one updates the
/// store first, then retargets rotation, emphasis and center content,
/// regenerates labels, and finally notifies subscribers.
pub struct DonutChart {
    state: ChartState,
    layout: RingLayout,
    policy: MotionPolicy,
    rotation: RotationController,
    center: CenterContent,
    pulse: PopPulse,
    emphasis: HashMap<CategoryId, AnimatedValue>,
    labels: Vec<SegmentLabel>,
    center_label: String,
    formatter: Box<dyn ValueFormatter>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl DonutChart {
    pub fn new(
        categories: Vec<Category>,
        initial_selection: Option<&CategoryId>,
        options: ChartOptions,
        formatter: impl ValueFormatter + 'static,
    ) -> Self {
        let mut chart = Self {
            state: ChartState::new(categories, initial_selection),
            layout: RingLayout::new(options.size),
            policy: MotionPolicy::new(options.reduced_motion),
            rotation: RotationController::new(options.alignment_angle),
            center: CenterContent::new(CenterView::Placeholder),
            pulse: PopPulse::default(),
            emphasis: HashMap::new(),
            labels: Vec::new(),
            center_label: String::new(),
            formatter: Box::new(formatter),
            listeners: Vec::new(),
            next_subscription: 0,
        };

        if let Some(center) = chart.selected_center_angle() {
            chart.rotation.snap_to(center);
        }
        chart.center = CenterContent::new(chart.center_view());
        chart.sync_emphasis(false);
        chart.regenerate_labels();
        chart
    }

    pub fn categories(&self) -> &[Category] {
        self.state.categories()
    }

    pub fn total(&self) -> f64 {
        self.state.total()
    }

    pub fn selection(&self) -> Selection<'_> {
        self.state.selection()
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    pub fn rotation_angle(&self) -> f64 {
        self.rotation.angle()
    }

    pub fn rotation_target(&self) -> f64 {
        self.rotation.target()
    }

    pub fn alignment_angle(&self) -> f64 {
        self.rotation.alignment()
    }

    pub fn pulse_scale(&self) -> f64 {
        self.pulse.scale()
    }

    pub fn labels(&self) -> &[SegmentLabel] {
        &self.labels
    }

    pub fn center_label(&self) -> &str {
        &self.center_label
    }

    pub fn center_frame(&self) -> CenterFrame<'_> {
        self.center.frame()
    }

    pub fn indicator_position(&self) -> Point {
        self.layout.indicator_position(self.rotation.alignment())
    }

    pub fn wedges(&self) -> Vec<Wedge> {
        let emphasis: Vec<f64> = self
            .state
            .categories()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                self.emphasis
                    .get(c.id())
                    .filter(|_| self.is_first_occurrence(i, c))
                    .map_or(0.0, AnimatedValue::value)
            })
            .collect();
        geometry::wedges(
            self.state.categories(),
            self.state.selection().index(),
            &emphasis,
            &self.layout,
        )
    }

    /// Returns `true` when the selection actually changed.
    pub fn select(&mut self, id: &CategoryId) -> bool {
        let Some(change) = self.state.select(id) else {
            return false;
        };
        log::debug!(
            "Selection {:?} -> '{}' (index {})",
            change.previous.as_ref().map(CategoryId::as_str),
            change.current,
            change.index
        );

        self.follow_selection();
        self.regenerate_labels();
        self.notify_selection();
        true
    }

    /// Hit-tests a point in chart coordinates and selects the segment under it.
    pub fn tap(&mut self, point: Point) -> bool {
        let hit = geometry::hit_test(
            point,
            &self.wedges(),
            &self.layout,
            self.rotation.angle(),
            self.pulse.scale(),
        );

        match hit.map(|index| self.state.categories()[index].id().clone()) {
            Some(id) => self.select(&id),
            None => false,
        }
    }

    pub fn replace_categories(&mut self, categories: Vec<Category>) {
        let replacement = self.state.replace_categories(categories);
        log::debug!(
            "Replaced categories ({} -> {})",
            replacement.previous_count,
            replacement.count
        );

        self.emphasis
            .retain(|id, _| self.state.position(id).is_some());
        if replacement.count_changed() {
            self.pulse.trigger(&self.policy);
        }

        self.follow_selection();
        self.regenerate_labels();

        self.notify(ChartEvent::CategoriesReplaced {
            previous_count: replacement.previous_count,
            count: replacement.count,
        });
        if replacement.selection_changed {
            self.notify_selection();
        }
    }

    /// Switches motion policy. Animations already in flight are retimed so
    /// none of them outlives the new policy's limits.
    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.policy = MotionPolicy::new(reduced_motion);

        self.rotation.retime(&self.policy);
        self.center.retime(&self.policy);
        self.pulse.retime(&self.policy);
        let emphasis = self.policy.transition(TransitionKind::SelectionScale);
        for value in self.emphasis.values_mut() {
            value.retime(emphasis);
        }
    }

    pub fn set_size(&mut self, size: f64) {
        self.layout = RingLayout::new(size);
    }

    pub fn set_alignment_angle(&mut self, alignment: f64) {
        self.rotation.set_alignment(alignment);
        if let Some(center) = self.selected_center_angle() {
            self.rotation.align_to(center, &self.policy);
        }
    }

    /// Swaps the value formatter and re-renders every label in place.
    pub fn set_formatter(&mut self, formatter: impl ValueFormatter + 'static) {
        self.formatter = Box::new(formatter);
        self.regenerate_labels();
        let view = self.center_view();
        self.center.show(view, &self.policy);
    }

    pub fn tick(&mut self, dt: Duration) {
        self.rotation.tick(dt);
        self.pulse.tick(dt);
        self.center.tick(dt);
        for value in self.emphasis.values_mut() {
            value.tick(dt);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.rotation.is_animating()
            || self.pulse.is_active()
            || self.center.is_animating()
            || self.emphasis.values().any(AnimatedValue::is_animating)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ChartEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn selected_center_angle(&self) -> Option<f64> {
        let index = self.state.selection().index()?;
        let range = angle::angle_range(index, self.state.categories(), self.state.total());
        (!range.is_degenerate()).then(|| range.center())
    }

    fn follow_selection(&mut self) {
        if let Some(center) = self.selected_center_angle() {
            self.rotation.align_to(center, &self.policy);
        }
        self.sync_emphasis(true);
        let view = self.center_view();
        self.center.show(view, &self.policy);
    }

    fn sync_emphasis(&mut self, animated: bool) {
        let transition = self.policy.transition(TransitionKind::SelectionScale);
        let selected = self.state.selection().index();

        // emphasis is keyed by id; later duplicates never own an entry
        for (i, category) in self.state.categories().iter().enumerate() {
            if !self.is_first_occurrence(i, category) {
                continue;
            }
            let target = if selected == Some(i) { 1.0 } else { 0.0 };
            let value = self
                .emphasis
                .entry(category.id().clone())
                .or_insert_with(|| AnimatedValue::new(0.0));

            if animated {
                if value.target() != target {
                    value.animate_to(target, transition);
                }
            } else {
                value.set_immediate(target);
            }
        }
    }

    fn is_first_occurrence(&self, index: usize, category: &Category) -> bool {
        self.state.position(category.id()) == Some(index)
    }

    fn center_view(&self) -> CenterView {
        match self.state.selection() {
            Selection::Selected { category, .. } => CenterView::Category(CenterSnapshot {
                id: category.id().clone(),
                name: category.name().clone(),
                symbol: category.symbol().clone(),
                color: category.color(),
                formatted_value: self.formatter.format_value(category.value()),
            }),
            Selection::Empty => CenterView::Placeholder,
        }
    }

    fn regenerate_labels(&mut self) {
        self.labels = labels::segment_labels(
            self.state.categories(),
            self.state.selection().index(),
            self.formatter.as_ref(),
        );
        self.center_label = labels::center_label(&self.state.selection(), self.formatter.as_ref());
    }

    fn notify_selection(&mut self) {
        if let Some(category) = self.state.selection().category().cloned() {
            self.notify(ChartEvent::SelectionChanged(category));
        }
    }

    fn notify(&mut self, event: ChartEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}
