//! Terminal rendering of a production: title card, scenes, curtain call.

pub mod layout;
pub mod typewriter;

use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub use typewriter::Typewriter;

use crate::screenplay::{Cast, DialogueLine, Scene, TitleCard};

/// Width used when the terminal size is unknown.
pub const DEFAULT_WIDTH: usize = 80;

/// Narrowest layout.
pub const MIN_WIDTH: usize = 40;

/// Widest layout; wider terminals get margins.
pub const MAX_WIDTH: usize = 100;

/// Commits listed under a scene before the list is cut short.
const FOOTNOTE_COMMITS: usize = 6;

/// Current terminal width, clamped to the supported range.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .unwrap_or(DEFAULT_WIDTH)
        .clamp(MIN_WIDTH, MAX_WIDTH)
}

/// Stdout, colored only when attached to a terminal.
pub fn stdout_stream() -> StandardStream {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn spec(fg: Option<Color>, bold: bool) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(fg).set_bold(bold);
    spec
}

/// Draws production parts onto a color-capable writer.
pub struct Renderer<W> {
    out: W,
    width: usize,
    typewriter: Typewriter,
}

impl<W: WriteColor> Renderer<W> {
    /// Renderer `width` columns wide (clamped to 40..=100).
    pub fn new(out: W, width: usize, typewriter: Typewriter) -> Self {
        Self {
            out,
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            typewriter,
        }
    }

    /// Layout width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Boxed title card.
    pub fn title_card(&mut self, card: &TitleCard) -> Result<()> {
        let mut lines = vec![
            String::new(),
            "COMMIT THEATRE PRESENTS".to_string(),
            String::new(),
            card.repository.to_uppercase(),
            card.subtitle(),
        ];
        if let Some(span) = card.span() {
            lines.push(span);
        }
        let people = if card.cast_size == 1 { "character" } else { "characters" };
        lines.push(format!("Starring {} {people}", card.cast_size));
        lines.push(String::new());

        self.out.set_color(&spec(Some(Color::Yellow), true))?;
        for line in layout::boxed(&lines, self.width) {
            writeln!(self.out, "{line}")?;
        }
        self.out.reset()?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    /// One scene: banner, heading, narration, dialogue, commit footnote.
    pub fn scene(&mut self, scene: &Scene, cast: &Cast) -> Result<()> {
        self.out.set_color(&spec(None, true))?;
        writeln!(
            self.out,
            "{}",
            layout::banner(&format!("SCENE {}", scene.number), self.width)
        )?;
        writeln!(self.out, "{}", layout::truncate(&scene.heading, self.width))?;
        self.out.reset()?;

        if scene.pivotal {
            self.out.set_color(&spec(Some(Color::Red), true))?;
            writeln!(self.out, "*** PIVOTAL MOMENT ***")?;
            self.out.reset()?;
        }
        writeln!(self.out)?;

        if !scene.narration.is_empty() {
            for line in layout::wrap(&scene.narration, self.width - 4) {
                self.out.write_all(b"  ")?;
                self.typewriter.type_out(&mut self.out, &line)?;
                writeln!(self.out)?;
            }
            writeln!(self.out)?;
        }

        for line in &scene.dialogue {
            self.dialogue(line, cast)?;
        }

        self.footnote(scene)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn dialogue(&mut self, line: &DialogueLine, cast: &Cast) -> Result<()> {
        let name_indent = self.width * 2 / 5;
        let paren_indent = self.width * 3 / 10;
        let line_indent = self.width / 5;

        let color = cast.by_name(&line.character).map(|c| c.color);
        self.out.set_color(&spec(color, true))?;
        writeln!(
            self.out,
            "{}{}",
            " ".repeat(name_indent),
            layout::truncate(&line.character.to_uppercase(), self.width - name_indent)
        )?;
        self.out.reset()?;

        if let Some(direction) = &line.direction {
            let direction = direction.trim().trim_start_matches('(').trim_end_matches(')');
            self.out.set_color(ColorSpec::new().set_italic(true))?;
            for wrapped in layout::wrap(&format!("({direction})"), self.width - 2 * paren_indent) {
                writeln!(self.out, "{}{wrapped}", " ".repeat(paren_indent))?;
            }
            self.out.reset()?;
        }

        for wrapped in layout::wrap(&line.line, self.width - 2 * line_indent) {
            write!(self.out, "{}", " ".repeat(line_indent))?;
            self.typewriter.type_out(&mut self.out, &wrapped)?;
            writeln!(self.out)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn footnote(&mut self, scene: &Scene) -> Result<()> {
        let mut shown: Vec<&str> = scene
            .commits
            .iter()
            .take(FOOTNOTE_COMMITS)
            .map(String::as_str)
            .collect();
        let hidden = scene.commits.len().saturating_sub(FOOTNOTE_COMMITS);
        let more = format!("+{hidden} more");
        if hidden > 0 {
            shown.push(&more);
        }

        self.out.set_color(ColorSpec::new().set_dimmed(true))?;
        for line in layout::wrap(&format!("[{}]", shown.join(" ")), self.width - 2) {
            writeln!(self.out, "  {line}")?;
        }
        self.out.reset()?;
        Ok(())
    }

    /// Boxed curtain call listing the cast in billing order.
    pub fn curtain_call(&mut self, cast: &Cast) -> Result<()> {
        self.out.set_color(&spec(Some(Color::Yellow), true))?;
        for line in layout::boxed(&["CURTAIN CALL".to_string()], self.width) {
            writeln!(self.out, "{line}")?;
        }
        self.out.reset()?;
        writeln!(self.out)?;

        for character in cast.characters() {
            write!(self.out, "  ")?;
            self.out.set_color(&spec(Some(character.color), true))?;
            write!(self.out, "{}", character.name)?;
            self.out.reset()?;
            let commits = if character.commit_count == 1 { "commit" } else { "commits" };
            writeln!(
                self.out,
                " as {} ({} {commits})",
                character.archetype, character.commit_count
            )?;
        }

        writeln!(self.out)?;
        self.out.set_color(&spec(None, true))?;
        writeln!(self.out, "{}", layout::center("THE END", self.width).trim_end())?;
        self.out.reset()?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use termcolor::Buffer;

    use super::*;
    use crate::density::test_utils::{by, commit};
    use crate::density::SceneKind;
    use crate::screenplay::SceneSource;

    fn render<F>(width: usize, draw: F) -> String
    where
        F: FnOnce(&mut Renderer<Buffer>) -> Result<()>,
    {
        let mut renderer = Renderer::new(Buffer::no_color(), width, Typewriter::instant());
        draw(&mut renderer).unwrap();
        String::from_utf8(renderer.into_inner().into_inner()).unwrap()
    }

    fn cast() -> Cast {
        Cast::from_commits(&[
            by(commit(0, "fix: a"), "Grace Hopper", "grace@example.com"),
            by(commit(1, "fix: b"), "Grace Hopper", "grace@example.com"),
            by(commit(2, "docs: c"), "Ada Lovelace", "ada@example.com"),
        ])
    }

    #[test]
    fn width_is_clamped() {
        let narrow = Renderer::new(Buffer::no_color(), 10, Typewriter::instant());
        assert_eq!(narrow.width(), MIN_WIDTH);
        let wide = Renderer::new(Buffer::no_color(), 300, Typewriter::instant());
        assert_eq!(wide.width(), MAX_WIDTH);
    }

    #[test]
    fn scene_layout() {
        let scene = Scene {
            number: 4,
            kind: SceneKind::Highlight,
            title: None,
            pivotal: true,
            commits: vec!["00000002".to_string()],
            heading: "EXT. SRC - NIGHT".to_string(),
            narration: "Thunder. The release branch is cut.".to_string(),
            dialogue: vec![DialogueLine {
                character: "ada".to_string(),
                direction: Some("(whispering)".to_string()),
                line: "Ship it.".to_string(),
            }],
            source: SceneSource::Ai,
        };
        let output = render(40, |r| r.scene(&scene, &cast()));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], format!("== SCENE 4 {}", "=".repeat(29)));
        assert_eq!(lines[1], "EXT. SRC - NIGHT");
        assert_eq!(lines[2], "*** PIVOTAL MOMENT ***");
        assert_eq!(lines[4], "  Thunder. The release branch is cut.");
        assert_eq!(lines[6], format!("{}ADA", " ".repeat(16)));
        assert_eq!(lines[7], format!("{}(whispering)", " ".repeat(12)));
        assert_eq!(lines[8], format!("{}Ship it.", " ".repeat(8)));
        assert_eq!(lines[10], "  [00000002]");
    }

    #[test]
    fn long_montage_footnote_is_cut() {
        let scene = Scene {
            number: 1,
            kind: SceneKind::Montage,
            title: Some("Testing".to_string()),
            pivotal: false,
            commits: (0..9).map(|i| format!("{i:08x}")).collect(),
            heading: "MONTAGE - TESTING".to_string(),
            narration: String::new(),
            dialogue: Vec::new(),
            source: SceneSource::Scripted,
        };
        let output = render(80, |r| r.scene(&scene, &Cast::default()));

        assert!(output.contains(
            "[00000000 00000001 00000002 00000003 00000004 00000005 +3 more]"
        ));
        assert!(!output.contains("PIVOTAL"));
    }

    #[test]
    fn curtain_call_lists_cast() {
        let output = render(40, |r| r.curtain_call(&cast()));

        assert!(output.contains("  GRACE as The Fixer (2 commits)\n"));
        assert!(output.contains("  ADA as The Scribe (1 commit)\n"));
        assert!(output.trim_end().ends_with("THE END"));
    }
}
