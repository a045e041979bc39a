//! Per-frame render snapshot.
//!
//! The host renderer draws what a [`RenderFrame`] lists and nothing else:
//! the visible prefix of each shown trajectory, the plate marker and
//! annotation of finished pitches, and the static scene hints.

use serde::Serialize;

use crate::builder::PlateMarker;
use crate::config::SceneHints;
use crate::physics::Point3;
use crate::session::PitchSession;

/// Linear RGBA
pub type Rgba = [f32; 4];

/// Trajectory colors, cycled by pitch index.
pub const PALETTE: [Rgba; 8] = [
    [0.90, 0.30, 0.30, 1.0],
    [0.30, 0.85, 0.40, 1.0],
    [0.30, 0.50, 0.95, 1.0],
    [0.95, 0.65, 0.20, 1.0],
    [0.80, 0.40, 0.85, 1.0],
    [0.95, 0.85, 0.25, 1.0],
    [0.35, 0.85, 0.85, 1.0],
    [0.80, 0.55, 0.35, 1.0],
];

const TAIL_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];

pub fn palette_color(index: usize) -> Rgba {
    PALETTE[index % PALETTE.len()]
}

/// Color of point `k` of `n`: fades from the pitch color at release to white.
pub fn gradient_color(base: Rgba, k: usize, n: usize) -> Rgba {
    let t = if n > 1 {
        (k as f32 / (n - 1) as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut out = base;
    for (c, w) in out.iter_mut().zip(TAIL_COLOR) {
        *c += (w - *c) * t;
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchView<'a> {
    pub index: usize,
    pub points: &'a [Point3],
    pub visible: usize,
    pub finished: bool,
    pub color: Rgba,
    pub marker: Option<&'a PlateMarker>,
    pub annotation: Option<String>,
}

impl<'a> PitchView<'a> {
    /// Points to draw this frame.
    pub fn visible_points(&self) -> &'a [Point3] {
        &self.points[..self.visible.min(self.points.len())]
    }

    /// Anchor for the annotation text.
    pub fn endpoint(&self) -> Option<Point3> {
        self.points.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame<'a> {
    pub pitches: Vec<PitchView<'a>>,
    pub animating: bool,
    pub scene: SceneHints,
}

impl<'a> RenderFrame<'a> {
    /// Snapshot the session's current display state.
    pub fn capture(session: &'a PitchSession) -> Self {
        let animating = session.playback().is_animating();

        let pitches = session
            .shown_indices()
            .into_iter()
            .filter_map(|i| {
                let pitch = session.pitch(i)?;
                let state = session.playback().get(i)?;
                let points = pitch.trajectory.points.as_slice();
                let finished = !animating || state.visible >= points.len();

                let annotation = (finished && session.show_labels() && !points.is_empty())
                    .then(|| pitch.summary(i).annotation());

                Some(PitchView {
                    index: i,
                    points,
                    visible: state.visible,
                    finished,
                    color: palette_color(i),
                    marker: if finished {
                        pitch.trajectory.marker.as_ref()
                    } else {
                        None
                    },
                    annotation,
                })
            })
            .collect();

        Self {
            pitches,
            animating,
            scene: *session.scene(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_env_source, parse_pitch_source};
    use crate::session::SessionOptions;

    fn session() -> PitchSession {
        let entries = parse_pitch_source(
            "# Heater\nSpeed=150,Axis=(0,0,1),RPM=2300\nSpeed=130,Axis=(0,1,0),RPM=2500\n",
            8,
        )
        .0;
        let env = parse_env_source("DT=0.001\nPITCH_SPEED_SCALE=1\nMSAA=2").unwrap();
        PitchSession::from_entries(
            entries,
            Some(&env),
            SessionOptions {
                seed: Some(4),
                ..SessionOptions::default()
            },
        )
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0), palette_color(8));
        assert_ne!(palette_color(0), palette_color(1));
    }

    #[test]
    fn test_gradient_endpoints() {
        let base = palette_color(2);
        assert_eq!(gradient_color(base, 0, 10), base);
        let tail = gradient_color(base, 9, 10);
        for (c, w) in tail.iter().zip(TAIL_COLOR) {
            assert!((c - w).abs() < 1e-6);
        }
        assert_eq!(gradient_color(base, 0, 1), base);
    }

    #[test]
    fn test_frame_while_animating() {
        let mut s = session();
        s.tick(0.0105);
        let frame = RenderFrame::capture(&s);
        assert!(frame.animating);
        assert_eq!(frame.scene.msaa_samples, 2);
        assert_eq!(frame.pitches.len(), 2);
        for v in &frame.pitches {
            assert!(!v.finished);
            assert_eq!(v.visible_points().len(), 11);
            assert!(v.marker.is_none());
            assert!(v.annotation.is_none());
        }
    }

    #[test]
    fn test_frame_when_finished() {
        let mut s = session();
        s.tick(5.0);
        let frame = RenderFrame::capture(&s);
        assert!(!frame.animating);

        let first = &frame.pitches[0];
        assert!(first.finished);
        assert_eq!(first.visible_points().len(), first.points.len());
        assert!(first.marker.is_some());
        assert_eq!(
            first.annotation.as_deref(),
            Some("1: Heater 150 km/h 2300 RPM")
        );
        assert!(frame.pitches[1]
            .annotation
            .as_deref()
            .unwrap()
            .starts_with("2: Pitch 2 "));

        s.toggle_labels();
        let frame = RenderFrame::capture(&s);
        assert!(frame.pitches.iter().all(|p| p.annotation.is_none()));
    }

    #[test]
    fn test_frame_respects_filter() {
        let mut s = session();
        s.toggle_filter(1).unwrap();
        let frame = RenderFrame::capture(&s);
        assert_eq!(frame.pitches.len(), 1);
        assert_eq!(frame.pitches[0].index, 1);
        assert_eq!(frame.pitches[0].color, palette_color(1));

        s.hide_all().unwrap();
        assert!(RenderFrame::capture(&s).pitches.is_empty());
    }

    #[test]
    fn test_frame_serializes() {
        let mut s = session();
        s.tick(5.0);
        let json = serde_json::to_string(&RenderFrame::capture(&s)).unwrap();
        assert!(json.contains("\"animating\":false"));
        assert!(json.contains("Heater"));
    }
}
