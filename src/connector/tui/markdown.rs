//! Minimal markdown → ratatui conversion for answers.
//!
//! Covers what generative models typically emit: headings, bullet and
//! numbered lists, block quotes, rules, inline bold/italic/code and fenced
//! code blocks. Code blocks are highlighted with syntect when the fence names
//! a known language.

use std::sync::OnceLock;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

use super::theme::Theme;

struct SyntaxAssets {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

fn syntax_assets() -> &'static SyntaxAssets {
    static ASSETS: OnceLock<SyntaxAssets> = OnceLock::new();
    ASSETS.get_or_init(|| SyntaxAssets {
        syntax_set: SyntaxSet::load_defaults_newlines(),
        theme_set: ThemeSet::load_defaults(),
    })
}

pub fn render_markdown(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    let base = Style::default().fg(theme.foreground);
    let mut lines = Vec::new();
    let mut fence: Option<CodeBlock> = None;

    for raw in text.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            fence = match fence {
                Some(_) => None,
                None => Some(CodeBlock::open(trimmed.trim_start_matches('`').trim(), theme)),
            };
            continue;
        }

        if let Some(block) = fence.as_mut() {
            lines.push(block.highlight(raw, theme));
            continue;
        }

        lines.push(render_block_line(raw, trimmed, base, theme));
    }

    lines
}

fn render_block_line(raw: &str, trimmed: &str, base: Style, theme: &Theme) -> Line<'static> {
    if let Some((level, heading)) = heading(trimmed) {
        let mut style = theme.title();
        if level > 2 {
            style = Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD);
        }
        return Line::from(parse_inline(heading, style, theme));
    }

    if is_rule(trimmed) {
        return Line::styled("─".repeat(32), theme.muted());
    }

    if let Some(quote) = trimmed.strip_prefix('>') {
        let style = theme.muted().add_modifier(Modifier::ITALIC);
        let mut spans = vec![Span::styled("│ ", theme.muted())];
        spans.extend(parse_inline(quote.trim_start(), style, theme));
        return Line::from(spans);
    }

    let indent = " ".repeat(raw.len() - trimmed.len());

    if let Some(item) = ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
    {
        let mut spans = vec![Span::raw(indent), Span::styled("• ", theme.border())];
        spans.extend(parse_inline(item, base, theme));
        return Line::from(spans);
    }

    if let Some((number, item)) = numbered_item(trimmed) {
        let mut spans = vec![
            Span::raw(indent),
            Span::styled(format!("{number}. "), theme.border()),
        ];
        spans.extend(parse_inline(item, base, theme));
        return Line::from(spans);
    }

    Line::from(parse_inline(raw, base, theme))
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|rest| (level, rest.trim()))
}

fn is_rule(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|c| line.chars().all(|ch| ch == *c))
}

fn numbered_item(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|rest| (&line[..digits], rest))
}

/// Split a line into spans for `**bold**`, `*italic*` and `` `code` ``.
/// Unmatched markers are kept as literal text.
fn parse_inline(text: &str, base: Style, theme: &Theme) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let code_style = Style::default().fg(theme.code).bg(theme.input_background);

    let mut spans = Vec::new();
    let mut buf = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut i = 0;

    let style_for = |bold: bool, italic: bool| {
        let mut style = base;
        if bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    };

    let flush = |buf: &mut String, spans: &mut Vec<Span<'static>>, style: Style| {
        if !buf.is_empty() {
            spans.push(Span::styled(std::mem::take(buf), style));
        }
    };

    while i < chars.len() {
        match chars[i] {
            '`' => {
                if let Some(end) = find_char(&chars, i + 1, '`') {
                    flush(&mut buf, &mut spans, style_for(bold, italic));
                    let code: String = chars[i + 1..end].iter().collect();
                    spans.push(Span::styled(code, code_style));
                    i = end + 1;
                    continue;
                }
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                if bold || find_pair(&chars, i + 2).is_some() {
                    flush(&mut buf, &mut spans, style_for(bold, italic));
                    bold = !bold;
                    i += 2;
                    continue;
                }
            }
            '*' => {
                let opens = chars.get(i + 1).is_some_and(|c| !c.is_whitespace())
                    && find_single_star(&chars, i + 1).is_some();
                if italic || opens {
                    flush(&mut buf, &mut spans, style_for(bold, italic));
                    italic = !italic;
                    i += 1;
                    continue;
                }
            }
            _ => {}
        }
        buf.push(chars[i]);
        i += 1;
    }

    flush(&mut buf, &mut spans, style_for(bold, italic));
    spans
}

fn find_char(chars: &[char], from: usize, needle: char) -> Option<usize> {
    chars
        .iter()
        .skip(from)
        .position(|c| *c == needle)
        .map(|p| p + from)
}

/// Next `*` that is not half of a `**`.
fn find_single_star(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len()).find(|&i| {
        chars[i] == '*'
            && chars.get(i + 1) != Some(&'*')
            && (i == 0 || chars[i - 1] != '*')
    })
}

fn find_pair(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&i| chars[i] == '*' && chars[i + 1] == '*')
}

/// State for one fenced code block.
struct CodeBlock {
    highlighter: Option<HighlightLines<'static>>,
}

impl CodeBlock {
    fn open(lang: &str, theme: &Theme) -> Self {
        let assets = syntax_assets();
        let syntax = if lang.is_empty() {
            None
        } else {
            assets
                .syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| assets.syntax_set.find_syntax_by_extension(lang))
        };

        let highlighter = syntax.and_then(|syntax| {
            assets
                .theme_set
                .themes
                .get(theme.syntax_theme())
                .map(|t| HighlightLines::new(syntax, t))
        });

        Self { highlighter }
    }

    fn highlight(&mut self, line: &str, theme: &Theme) -> Line<'static> {
        let fallback = || Line::styled(format!("  {line}"), Style::default().fg(theme.code));

        let Some(highlighter) = self.highlighter.as_mut() else {
            return fallback();
        };

        let with_newline = format!("{line}\n");
        let Ok(ranges) = highlighter.highlight_line(&with_newline, &syntax_assets().syntax_set)
        else {
            return fallback();
        };

        let mut spans = vec![Span::raw("  ")];
        for (style, text) in ranges {
            let text = text.trim_end_matches('\n');
            if text.is_empty() {
                continue;
            }
            let fg = style.foreground;
            let mut span_style =
                Style::default().fg(ratatui::style::Color::Rgb(fg.r, fg.g, fg.b));
            if style.font_style.contains(FontStyle::BOLD) {
                span_style = span_style.add_modifier(Modifier::BOLD);
            }
            if style.font_style.contains(FontStyle::ITALIC) {
                span_style = span_style.add_modifier(Modifier::ITALIC);
            }
            spans.push(Span::styled(text.to_string(), span_style));
        }
        Line::from(spans)
    }
}
