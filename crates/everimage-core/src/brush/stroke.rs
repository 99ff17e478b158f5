/// Pointer state of a brush.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Drawing {
        last_x: f32,
        last_y: f32,
    },
}

/// `Idle -> Drawing` on pointer down, back to `Idle` on pointer up/leave.
///
/// Every event while drawing yields the points to stamp. Without `spacing`
/// only the event position is stamped, so fast drags leave gaps; with
/// `spacing` the segment from the previous position is filled with stamps at
/// most `spacing` pixels apart.
#[derive(Clone, Debug, Default)]
pub struct Stroke {
    state: StrokeState,
    spacing: Option<f32>,
}

impl Stroke {
    pub fn new(spacing: Option<f32>) -> Self {
        Self {
            state: StrokeState::Idle,
            spacing: spacing.filter(|s| *s > 0.0),
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> Vec<(f32, f32)> {
        self.state = StrokeState::Drawing {
            last_x: x,
            last_y: y,
        };
        vec![(x, y)]
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> Vec<(f32, f32)> {
        let StrokeState::Drawing { last_x, last_y } = self.state else {
            return Vec::new();
        };
        self.state = StrokeState::Drawing {
            last_x: x,
            last_y: y,
        };
        match self.spacing {
            None => vec![(x, y)],
            Some(spacing) => interpolate(last_x, last_y, x, y, spacing),
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = StrokeState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}

/// Points after `(x0, y0)` up to and including `(x1, y1)`, evenly spaced.
fn interpolate(x0: f32, y0: f32, x1: f32, y1: f32, spacing: f32) -> Vec<(f32, f32)> {
    let (dx, dy) = (x1 - x0, y1 - y0);
    let distance = (dx * dx + dy * dy).sqrt();
    let steps = (distance / spacing).ceil().max(1.0) as usize;
    (1..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            (x0 + dx * t, y0 + dy * t)
        })
        .collect()
}
