use crate::category::{CategoryId, CategoryName, Color, SymbolName};
use crate::motion::{AnimatedValue, MotionPolicy, TransitionKind};
use std::time::Duration;

const MORPH_INCOMING_SCALE: f64 = 0.8;
const MORPH_OUTGOING_SCALE: f64 = 1.15;

/// What the center of the ring shows for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterSnapshot {
    pub id: CategoryId,
    pub name: CategoryName,
    pub symbol: SymbolName,
    pub color: Color,
    pub formatted_value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CenterView {
    Placeholder,
    Category(CenterSnapshot),
}

impl CenterView {
    /// Identity used to decide whether a change is a morph. The placeholder
    /// has none.
    pub fn key(&self) -> Option<&CategoryId> {
        match self {
            Self::Placeholder => None,
            Self::Category(snapshot) => Some(&snapshot.id),
        }
    }
}

/// One rendered layer of the center content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterLayer<'a> {
    pub view: &'a CenterView,
    pub opacity: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterFrame<'a> {
    pub incoming: CenterLayer<'a>,
    pub outgoing: Option<CenterLayer<'a>>,
}

/// Center content with an identity-keyed morph between selections.
///
/// `progress` runs from 0 (outgoing fully visible) to 1 (incoming fully
/// visible). Interrupting a morph re-derives the progress so that whatever is
/// on screen stays at its current opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterContent {
    incoming: CenterView,
    outgoing: Option<CenterView>,
    progress: AnimatedValue,
}

impl CenterContent {
    pub fn new(view: CenterView) -> Self {
        Self {
            incoming: view,
            outgoing: None,
            progress: AnimatedValue::new(1.0),
        }
    }

    pub fn current(&self) -> &CenterView {
        &self.incoming
    }

    pub fn show(&mut self, view: CenterView, policy: &MotionPolicy) {
        if view.key() == self.incoming.key() {
            self.incoming = view;
            return;
        }

        // The current incoming layer becomes the outgoing one at its on-screen
        // opacity. Going back to the layer that was fading out is a pure swap.
        let carried = self.progress.value();
        self.outgoing = Some(std::mem::replace(&mut self.incoming, view));
        self.progress.set_immediate(1.0 - carried);
        self.progress
            .animate_to(1.0, policy.transition(TransitionKind::CenterMorph));
    }

    pub fn retime(&mut self, policy: &MotionPolicy) {
        self.progress
            .retime(policy.transition(TransitionKind::CenterMorph));
    }

    pub fn tick(&mut self, dt: Duration) {
        self.progress.tick(dt);
        if !self.progress.is_animating() {
            self.outgoing = None;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.progress.is_animating()
    }

    pub fn frame(&self) -> CenterFrame<'_> {
        let p = self.progress.value().clamp(0.0, 1.0);
        CenterFrame {
            incoming: CenterLayer {
                view: &self.incoming,
                opacity: p,
                scale: lerp(MORPH_INCOMING_SCALE, 1.0, p),
            },
            outgoing: self.outgoing.as_ref().map(|view| CenterLayer {
                view,
                opacity: 1.0 - p,
                scale: lerp(1.0, MORPH_OUTGOING_SCALE, p),
            }),
        }
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgba;

    fn view(id: &str) -> CenterView {
        CenterView::Category(CenterSnapshot {
            id: CategoryId::from(id),
            name: CategoryName::from(id),
            symbol: SymbolName::from("folder"),
            color: Srgba::new(0.2, 0.3, 0.4, 1.0),
            formatted_value: "$1.00".to_string(),
        })
    }

    fn key(layer: &CenterLayer<'_>) -> Option<String> {
        layer.view.key().map(|k| k.to_string())
    }

    #[test]
    fn test_identity_change_morphs() {
        let policy = MotionPolicy::new(true);
        let mut center = CenterContent::new(view("food"));

        center.show(view("rent"), &policy);
        let frame = center.frame();
        assert_eq!(key(&frame.incoming), Some("rent".to_string()));
        assert_eq!(frame.incoming.opacity, 0.0);
        assert_eq!(frame.outgoing.map(|l| l.opacity), Some(1.0));

        center.tick(Duration::from_millis(100));
        let frame = center.frame();
        assert_eq!(frame.incoming.opacity, 1.0);
        assert_eq!(frame.incoming.scale, 1.0);
        assert!(frame.outgoing.is_none());
    }

    #[test]
    fn test_same_identity_updates_in_place() {
        let policy = MotionPolicy::default();
        let mut center = CenterContent::new(view("food"));

        center.show(view("food"), &policy);
        assert!(!center.is_animating());
        assert!(center.frame().outgoing.is_none());
    }

    #[test]
    fn test_reversal_keeps_on_screen_opacity() {
        let policy = MotionPolicy::new(true);
        let mut center = CenterContent::new(view("food"));

        center.show(view("rent"), &policy);
        center.tick(Duration::from_millis(30));
        let rent_opacity = center.frame().incoming.opacity;

        center.show(view("food"), &policy);
        let frame = center.frame();
        assert_eq!(key(&frame.incoming), Some("food".to_string()));
        assert!((frame.outgoing.unwrap().opacity - rent_opacity).abs() < 1e-9);
    }

    #[test]
    fn test_rapid_third_selection_is_continuous() {
        let policy = MotionPolicy::new(true);
        let mut center = CenterContent::new(view("food"));

        center.show(view("rent"), &policy);
        center.tick(Duration::from_millis(70));
        let rent_opacity = center.frame().incoming.opacity;

        center.show(view("fun"), &policy);
        let frame = center.frame();
        assert_eq!(key(&frame.incoming), Some("fun".to_string()));
        let outgoing = frame.outgoing.unwrap();
        assert_eq!(key(&outgoing), Some("rent".to_string()));
        assert!((outgoing.opacity - rent_opacity).abs() < 1e-9);
    }

    #[test]
    fn test_placeholder_to_category_morphs() {
        let policy = MotionPolicy::new(true);
        let mut center = CenterContent::new(CenterView::Placeholder);

        center.show(view("food"), &policy);
        assert!(center.is_animating());
        assert_eq!(
            center.frame().outgoing.map(|l| l.view.clone()),
            Some(CenterView::Placeholder)
        );
    }
}
