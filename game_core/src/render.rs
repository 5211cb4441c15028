//! Frame description for a display surface
//!
//! The simulation never draws itself: it describes what a frame contains and
//! a frontend paints it.

/// RGBA colour, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);
}

/// Something to paint, in playfield pixels
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
    },
    /// Text horizontally centred on `x`, top edge at `y`
    Text {
        x: f32,
        y: f32,
        size: f32,
        content: String,
        color: Color,
    },
}

/// One frame, painted in order over a cleared background
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    pub shapes: Vec<Shape>,
}

impl Frame {
    pub fn new(width: f32, height: f32, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// All text shapes, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

pub const SCORE_TEXT_SIZE: f32 = 50.0;
pub const HITS_TEXT_SIZE: f32 = 50.0;

/// Dashed centre line: 20 segments, every other one drawn
pub(crate) fn centre_line(frame: &mut Frame) {
    let segment = (frame.height / 20.0).floor().max(1.0);
    let x = frame.width / 2.0 - 5.0;
    let mut y = 10.0;
    let mut index = 0;
    while y < frame.height {
        if index % 2 == 0 {
            frame.push(Shape::Rect {
                x,
                y,
                w: 10.0,
                h: segment,
                color: Color::WHITE,
            });
        }
        y += segment;
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_line_is_dashed() {
        let mut frame = Frame::new(700.0, 500.0, Color::BLACK);
        centre_line(&mut frame);

        assert!(!frame.shapes.is_empty());
        let ys: Vec<f32> = frame
            .shapes
            .iter()
            .map(|s| match s {
                Shape::Rect { y, .. } => *y,
                _ => panic!("Centre line is rects only"),
            })
            .collect();
        // Gaps between consecutive dashes are one segment long
        for pair in ys.windows(2) {
            assert_eq!(pair[1] - pair[0], 50.0);
        }
    }

    #[test]
    fn test_texts_filters_shapes() {
        let mut frame = Frame::new(10.0, 10.0, Color::BLACK);
        frame.push(Shape::Circle {
            x: 1.0,
            y: 1.0,
            radius: 1.0,
            color: Color::WHITE,
        });
        frame.push(Shape::Text {
            x: 5.0,
            y: 0.0,
            size: 12.0,
            content: "3".to_string(),
            color: Color::RED,
        });
        assert_eq!(frame.texts().collect::<Vec<_>>(), vec!["3"]);
    }
}
