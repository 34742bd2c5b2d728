use iced::mouse;
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Font, Point, Rectangle, Renderer, Size, Theme};

const PAD_LEFT: f32 = 44.0;
const PAD_RIGHT: f32 = 8.0;
const PAD_TOP: f32 = 22.0;
/// Room for the category labels under the plot.
const PAD_BOTTOM: f32 = 20.0;

/// Hover state: stores the snapped category index (not raw pixel).
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    pub hover_idx: Option<usize>,
}

/// Colors the chart needs from the active palette.
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    pub bg: Color,
    pub border: Color,
    pub grid: Color,
    pub label: Color,
    pub text: Color,
}

/// One named, colored series of values aligned with the chart categories.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub color: Color,
    pub values: Vec<f32>,
}

impl Series {
    pub fn new(label: impl Into<String>, color: Color, values: Vec<f32>) -> Self {
        Self { label: label.into(), color, values }
    }
}

/// Y range covering every value with a little headroom, never inverted.
pub fn value_range<'a>(series: impl IntoIterator<Item = &'a Series>, floor_at_zero: bool) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for value in series.into_iter().flat_map(|s| s.values.iter().copied()) {
        lo = lo.min(value);
        hi = hi.max(value);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if floor_at_zero {
        lo = lo.min(0.0);
    }
    let span = (hi - lo).max(1.0);
    let lo = if floor_at_zero { lo } else { lo - span * 0.1 };
    (lo, hi + span * 0.1)
}

/// Plot area inside the padded bounds.
#[derive(Debug, Clone, Copy)]
struct Plot {
    w: f32,
    h: f32,
}

impl Plot {
    fn new(bounds: Rectangle) -> Option<Self> {
        let w = bounds.width - PAD_LEFT - PAD_RIGHT;
        let h = bounds.height - PAD_TOP - PAD_BOTTOM;
        (w > 0.0 && h > 0.0).then_some(Self { w, h })
    }

    fn y(&self, value: f32, y_min: f32, y_max: f32) -> f32 {
        let range = y_max - y_min;
        let normalized = if range > 0.0 { ((value - y_min) / range).clamp(0.0, 1.0) } else { 0.5 };
        PAD_TOP + self.h * (1.0 - normalized)
    }
}

fn draw_chrome(frame: &mut Frame, bounds: Rectangle, c: &ChartColors, title: &str) {
    let bg = Path::rectangle(Point::ORIGIN, bounds.size());
    frame.fill(&bg, c.bg);

    let border = Path::rectangle(Point::new(0.5, 0.5), Size::new(bounds.width - 1.0, bounds.height - 1.0));
    frame.stroke(&border, Stroke::default().with_color(c.border).with_width(0.5));

    let mut title_text = Text::from(title.to_string());
    title_text.position = Point::new(PAD_LEFT, 3.0);
    title_text.color = c.text;
    title_text.size = 12.0.into();
    title_text.font = Font::DEFAULT;
    frame.fill_text(title_text);
}

/// Y-axis labels + grid at nice round tick values.
fn draw_y_axis(frame: &mut Frame, plot: Plot, c: &ChartColors, y_min: f32, y_max: f32) {
    let y_range = y_max - y_min;
    if y_range <= 0.0 {
        return;
    }
    let step = nice_tick_step(y_range, 6);
    let mut val = (y_min / step).ceil() * step;
    while val <= y_max + step * 0.001 {
        let y = plot.y(val, y_min, y_max);
        let grid = Path::line(Point::new(PAD_LEFT, y), Point::new(PAD_LEFT + plot.w, y));
        frame.stroke(&grid, Stroke::default().with_color(c.grid).with_width(1.0));

        let label_str = if step >= 1.0 { format!("{val:.0}") } else { format!("{val:.1}") };
        let mut label = Text::from(label_str);
        label.position = Point::new(4.0, y - 5.0);
        label.color = c.label;
        label.size = 10.0.into();
        label.font = Font::MONOSPACE;
        frame.fill_text(label);

        val += step;
    }
}

fn draw_category(frame: &mut Frame, c: &ChartColors, label: &str, center_x: f32, bounds: Rectangle) {
    let mut text = Text::from(label.to_string());
    text.position = Point::new(center_x - label.chars().count() as f32 * 2.8, bounds.height - PAD_BOTTOM + 4.0);
    text.color = c.label;
    text.size = 10.0.into();
    text.font = Font::MONOSPACE;
    frame.fill_text(text);
}

fn draw_legend(frame: &mut Frame, bounds: Rectangle, c: &ChartColors, series: &[Series]) {
    let mut lx = bounds.width - 10.0;
    let ly = 7.0;
    for s in series.iter().rev() {
        let text_w = s.label.chars().count() as f32 * 6.0 + 14.0;
        lx -= text_w;
        let dot = Path::circle(Point::new(lx, ly + 3.0), 3.0);
        frame.fill(&dot, s.color);
        let mut lt = Text::from(s.label.clone());
        lt.position = Point::new(lx + 8.0, ly - 2.0);
        lt.color = c.label;
        lt.size = 10.0.into();
        lt.font = Font::DEFAULT;
        frame.fill_text(lt);
    }
}

/// Tooltip box listing each series' value at the hovered category.
fn draw_tooltip(
    frame: &mut Frame,
    c: &ChartColors,
    plot: Plot,
    anchor_x: f32,
    lines: &[(String, Color)],
) {
    let mut tooltip_y = PAD_TOP + 4.0;
    for (line, color) in lines {
        let text_w = line.chars().count() as f32 * 6.6 + 20.0;
        let tx = (anchor_x + 14.0).min(PAD_LEFT + plot.w - text_w);

        let shadow_path = Path::rectangle(Point::new(tx - 3.0, tooltip_y), Size::new(text_w, 18.0));
        frame.fill(&shadow_path, Color::from_rgba(0.0, 0.0, 0.0, 0.15));

        let box_path = Path::rectangle(Point::new(tx - 4.0, tooltip_y - 2.0), Size::new(text_w, 18.0));
        frame.fill(&box_path, Color::from_rgba(c.bg.r, c.bg.g, c.bg.b, 0.95));
        frame.stroke(&box_path, Stroke::default()
            .with_color(Color::from_rgba(color.r, color.g, color.b, 0.4))
            .with_width(0.8));

        let mut tt = Text::from(line.clone());
        tt.position = Point::new(tx, tooltip_y);
        tt.color = *color;
        tt.size = 11.0.into();
        tt.font = Font::MONOSPACE;
        frame.fill_text(tt);
        tooltip_y += 20.0;
    }
}

fn tooltip_lines(series: &[Series], idx: usize, category: Option<&String>, unit: &str) -> Vec<(String, Color)> {
    series
        .iter()
        .filter_map(|s| s.values.get(idx).map(|v| (s, *v)))
        .map(|(s, v)| {
            let head = match category {
                Some(cat) if series.len() == 1 => cat.clone(),
                _ => s.label.clone(),
            };
            (format!("{head}: {v:.1}{unit}"), s.color)
        })
        .collect()
}

// ─── LINE CHART ─────────────────────────────────────────────────

/// A line chart drawn via iced Canvas with hover tooltip support.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub series: Vec<Series>,
    /// X-axis labels, one per data point.
    pub categories: Vec<String>,
    pub y_min: f32,
    pub y_max: f32,
    pub title: String,
    pub filled: bool,
    /// Unit suffix for the tooltip (e.g. " kWh", " Hz", "°C").
    pub unit: String,
    pub colors: ChartColors,
}

impl LineChart {
    /// Number of data points in the longest series.
    fn data_len(&self) -> usize {
        self.series.iter().map(|s| s.values.len()).max().unwrap_or(0)
    }

    fn x(&self, plot: Plot, idx: usize, n: usize) -> f32 {
        PAD_LEFT + (idx as f32 / (n - 1) as f32) * plot.w
    }
}

impl<Message: 'static> canvas::Program<Message> for LineChart {
    type State = ChartState;

    fn update(
        &self,
        state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let n = self.data_len();
        let new_idx = match &event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                Plot::new(bounds).zip(cursor.position_in(bounds)).and_then(|(plot, pos)| {
                    if n >= 2 && pos.x >= PAD_LEFT && pos.x <= PAD_LEFT + plot.w {
                        let frac = (pos.x - PAD_LEFT) / plot.w;
                        Some(((frac * (n - 1) as f32).round() as usize).min(n - 1))
                    } else {
                        None
                    }
                })
            }
            Event::Mouse(mouse::Event::CursorLeft) => None,
            _ => return (canvas::event::Status::Ignored, None),
        };
        if new_idx != state.hover_idx {
            state.hover_idx = new_idx;
        }
        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let c = &self.colors;
        let Some(plot) = Plot::new(bounds) else {
            return vec![frame.into_geometry()];
        };

        draw_chrome(&mut frame, bounds, c, &self.title);
        draw_y_axis(&mut frame, plot, c, self.y_min, self.y_max);

        let n = self.data_len();
        if n >= 2 {
            for (i, cat) in self.categories.iter().enumerate().take(n) {
                draw_category(&mut frame, c, cat, self.x(plot, i, n), bounds);
            }
        }

        for s in &self.series {
            if s.values.len() < 2 {
                continue;
            }
            let points: Vec<Point> = s
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| Point::new(self.x(plot, i, n), plot.y(v, self.y_min, self.y_max)))
                .collect();

            if self.filled {
                let mut builder = canvas::path::Builder::new();
                builder.move_to(Point::new(points[0].x, PAD_TOP + plot.h));
                for p in &points {
                    builder.line_to(*p);
                }
                builder.line_to(Point::new(points[points.len() - 1].x, PAD_TOP + plot.h));
                builder.close();
                let fill_color = Color::from_rgba(s.color.r, s.color.g, s.color.b, 0.15);
                frame.fill(&builder.build(), fill_color);
            }

            let mut builder = canvas::path::Builder::new();
            for (i, p) in points.iter().enumerate() {
                if i == 0 {
                    builder.move_to(*p);
                } else {
                    builder.line_to(*p);
                }
            }
            let path = builder.build();
            let glow_color = Color::from_rgba(s.color.r, s.color.g, s.color.b, 0.2);
            frame.stroke(&path, Stroke::default().with_color(glow_color).with_width(4.0));
            frame.stroke(&path, Stroke::default().with_color(s.color).with_width(1.8));
        }

        if let Some(idx) = state.hover_idx.filter(|&i| n >= 2 && i < n) {
            let snap_x = self.x(plot, idx, n);
            let crosshair = Path::line(Point::new(snap_x, PAD_TOP), Point::new(snap_x, PAD_TOP + plot.h));
            frame.stroke(
                &crosshair,
                Stroke::default()
                    .with_color(Color::from_rgba(c.text.r, c.text.g, c.text.b, 0.35))
                    .with_width(1.0),
            );
            for s in &self.series {
                if let Some(&v) = s.values.get(idx) {
                    let dot_y = plot.y(v, self.y_min, self.y_max);
                    let glow = Path::circle(Point::new(snap_x, dot_y), 7.0);
                    frame.fill(&glow, Color::from_rgba(s.color.r, s.color.g, s.color.b, 0.25));
                    let dot = Path::circle(Point::new(snap_x, dot_y), 4.0);
                    frame.fill(&dot, s.color);
                    frame.stroke(&dot, Stroke::default().with_color(c.text).with_width(1.2));
                }
            }
            let lines = tooltip_lines(&self.series, idx, self.categories.get(idx), &self.unit);
            draw_tooltip(&mut frame, c, plot, snap_x, &lines);
        }

        draw_legend(&mut frame, bounds, c, &self.series);
        vec![frame.into_geometry()]
    }
}

// ─── BAR CHART ──────────────────────────────────────────────────

/// Grouped vertical bars, one group per category.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub series: Vec<Series>,
    pub categories: Vec<String>,
    pub y_max: f32,
    pub title: String,
    pub unit: String,
    pub colors: ChartColors,
    /// Per-category override of the bar color (single-series charts).
    pub bar_colors: Option<Vec<Color>>,
}

impl BarChart {
    fn groups(&self) -> usize {
        self.categories
            .len()
            .max(self.series.iter().map(|s| s.values.len()).max().unwrap_or(0))
    }

    fn bar_color(&self, series: &Series, idx: usize) -> Color {
        self.bar_colors
            .as_ref()
            .and_then(|colors| colors.get(idx).copied())
            .unwrap_or(series.color)
    }
}

impl<Message: 'static> canvas::Program<Message> for BarChart {
    type State = ChartState;

    fn update(
        &self,
        state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let groups = self.groups();
        let new_idx = match &event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                Plot::new(bounds).zip(cursor.position_in(bounds)).and_then(|(plot, pos)| {
                    if groups > 0 && pos.x >= PAD_LEFT && pos.x < PAD_LEFT + plot.w {
                        let slot = plot.w / groups as f32;
                        Some((((pos.x - PAD_LEFT) / slot) as usize).min(groups - 1))
                    } else {
                        None
                    }
                })
            }
            Event::Mouse(mouse::Event::CursorLeft) => None,
            _ => return (canvas::event::Status::Ignored, None),
        };
        if new_idx != state.hover_idx {
            state.hover_idx = new_idx;
        }
        (canvas::event::Status::Ignored, None)
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let c = &self.colors;
        let Some(plot) = Plot::new(bounds) else {
            return vec![frame.into_geometry()];
        };

        draw_chrome(&mut frame, bounds, c, &self.title);
        draw_y_axis(&mut frame, plot, c, 0.0, self.y_max);

        let groups = self.groups();
        if groups == 0 || self.series.is_empty() {
            return vec![frame.into_geometry()];
        }
        let slot = plot.w / groups as f32;
        let group_w = slot * 0.7;
        let bar_w = group_w / self.series.len() as f32;

        for idx in 0..groups {
            let slot_x = PAD_LEFT + slot * idx as f32;
            if state.hover_idx == Some(idx) {
                let highlight = Path::rectangle(Point::new(slot_x, PAD_TOP), Size::new(slot, plot.h));
                frame.fill(&highlight, Color::from_rgba(c.text.r, c.text.g, c.text.b, 0.06));
            }
            let group_x = slot_x + (slot - group_w) / 2.0;
            for (si, s) in self.series.iter().enumerate() {
                let Some(&v) = s.values.get(idx) else { continue };
                let top = plot.y(v, 0.0, self.y_max);
                let bar = Path::rectangle(
                    Point::new(group_x + bar_w * si as f32 + 1.0, top),
                    Size::new((bar_w - 2.0).max(1.0), PAD_TOP + plot.h - top),
                );
                frame.fill(&bar, self.bar_color(s, idx));
            }
            if let Some(cat) = self.categories.get(idx) {
                draw_category(&mut frame, c, cat, slot_x + slot / 2.0, bounds);
            }
        }

        if let Some(idx) = state.hover_idx.filter(|&i| i < groups) {
            let anchor_x = PAD_LEFT + slot * idx as f32 + slot / 2.0;
            let lines = tooltip_lines(&self.series, idx, self.categories.get(idx), &self.unit);
            draw_tooltip(&mut frame, c, plot, anchor_x, &lines);
        }

        if self.series.len() > 1 {
            draw_legend(&mut frame, bounds, c, &self.series);
        }
        vec![frame.into_geometry()]
    }
}

/// Pick a "nice" tick step (1, 2, 5, 10, 20, 50, …) so that the range
/// is divided into at most `max_ticks` intervals.
fn nice_tick_step(range: f32, max_ticks: usize) -> f32 {
    let rough = range / max_ticks as f32;
    let mag = 10f32.powf(rough.log10().floor());
    let norm = rough / mag;
    let nice = if norm <= 1.0 { 1.0 } else if norm <= 2.0 { 2.0 } else if norm <= 5.0 { 5.0 } else { 10.0 };
    (nice * mag).max(f32::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_tick_step() {
        assert_eq!(nice_tick_step(100.0, 10), 10.0);
        assert_eq!(nice_tick_step(4000.0, 6), 1000.0);
        assert!((nice_tick_step(1.0, 10) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_value_range_has_headroom() {
        let s = Series::new("kWh", Color::BLACK, vec![2000.0, 4100.0]);
        let (lo, hi) = value_range([&s], true);
        assert_eq!(lo, 0.0);
        assert!(hi > 4100.0);
    }

    #[test]
    fn test_value_range_of_nothing() {
        assert_eq!(value_range(std::iter::empty(), false), (0.0, 1.0));
    }

    #[test]
    fn test_tooltip_names_category_for_single_series() {
        let s = vec![Series::new("Charge", Color::BLACK, vec![85.0, 63.0])];
        let cats = vec!["Cell A".to_string(), "Cell F".to_string()];
        let lines = tooltip_lines(&s, 1, cats.get(1), "%");
        assert_eq!(lines[0].0, "Cell F: 63.0%");
    }

    #[test]
    fn test_bar_color_override() {
        let chart = BarChart {
            series: vec![Series::new("Charge", Color::BLACK, vec![85.0, 63.0])],
            categories: vec![],
            y_max: 100.0,
            title: String::new(),
            unit: String::new(),
            colors: ChartColors {
                bg: Color::WHITE,
                border: Color::BLACK,
                grid: Color::BLACK,
                label: Color::BLACK,
                text: Color::BLACK,
            },
            bar_colors: Some(vec![Color::WHITE]),
        };
        assert_eq!(chart.groups(), 2);
        assert_eq!(chart.bar_color(&chart.series[0], 0), Color::WHITE);
        assert_eq!(chart.bar_color(&chart.series[0], 1), Color::BLACK);
    }
}
