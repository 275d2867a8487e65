use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use crate::color::Color;
use crate::pipeline::assign::{role_index, Derivation};
use crate::theme::Role;

fn to_term(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Choose black or white text for readable labels on the given background.
fn contrast_fg(c: Color) -> TermColor {
    if c.relative_luminance() > 0.4 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

/// Roles taken from position `index` of a sequence of `len` colors.
fn roles_at(index: usize, len: usize) -> Vec<&'static str> {
    Role::ALL
        .iter()
        .filter(|role| role_index(**role, len) == index)
        .map(|role| role.as_str())
        .collect()
}

/// One line per sorted color: a swatch labelled with its hex value, followed
/// by the roles assigned from that position.
pub fn render(derivation: &Derivation, out: &mut impl Write) -> io::Result<()> {
    let len = derivation.sorted.len();
    for (index, color) in derivation.sorted.iter().enumerate() {
        queue!(
            out,
            SetBackgroundColor(to_term(*color)),
            SetForegroundColor(contrast_fg(*color)),
            Print(format!("  {color}  ")),
            ResetColor,
        )?;
        let roles = roles_at(index, len);
        if !roles.is_empty() {
            queue!(out, Print(format!(" {}", roles.join(", "))))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::assign::derive_from_swatches;
    use crate::pipeline::extract::Swatch;

    fn derivation() -> Derivation {
        let swatches = [(10, 10, 10), (240, 240, 240), (200, 40, 40), (40, 200, 40)]
            .into_iter()
            .map(|(r, g, b)| Swatch {
                color: Color::new(r, g, b),
                weight: 0.25,
            })
            .collect();
        derive_from_swatches(swatches, false).unwrap()
    }

    #[test]
    fn every_position_is_listed_with_its_roles() {
        let derivation = derivation();
        let mut buf = Vec::new();
        render(&derivation, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().count(), 4);
        for color in &derivation.sorted {
            assert!(text.contains(&color.to_hex()), "missing {color}");
        }
        let first = text.lines().next().unwrap();
        assert!(first.ends_with(" high"), "got {first:?}");
        let second = text.lines().nth(1).unwrap();
        assert!(second.ends_with(" background, primary"), "got {second:?}");
        assert!(text.lines().last().unwrap().ends_with(" foreground"));
    }

    #[test]
    fn roles_share_positions_in_short_sequences() {
        assert_eq!(roles_at(0, 3), vec!["high"]);
        assert_eq!(roles_at(1, 3), vec!["background", "primary"]);
        assert_eq!(roles_at(2, 3), vec!["foreground", "accent"]);
    }
}
