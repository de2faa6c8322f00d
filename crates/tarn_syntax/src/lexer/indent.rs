//! Indentation handling for the Tarn lexer
//!
//! Implements Python-style INDENT/DEDENT tokens.

use super::Lexer;
use super::tokens::{Token, TokenKind};
use crate::ast::Span;
use crate::diagnostics::CompileError;

/// Tabs advance the column to the next multiple of this width.
pub const TAB_WIDTH: usize = 8;

impl<'a> Lexer<'a> {
    pub(super) fn handle_indentation(&mut self) {
        let start = self.current_pos;
        let mut indent = 0;

        // Count leading spaces/tabs
        while let Some(c) = self.peek() {
            match c {
                ' ' => {
                    indent += 1;
                    self.advance();
                }
                '\t' => {
                    indent = (indent / TAB_WIDTH + 1) * TAB_WIDTH;
                    self.advance();
                }
                '#' => {
                    // Comment line - skip to end
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    return; // Stay at line start
                }
                '\n' => {
                    // Blank line - skip
                    self.advance();
                    return; // Stay at line start
                }
                '\r' | '\x0c' => {
                    self.advance();
                }
                _ => break,
            }
        }

        // At end of file?
        if self.is_at_end() {
            self.at_line_start = false;
            return;
        }

        let current_indent = *self.indent_stack.last().unwrap_or(&0);

        if indent > current_indent {
            self.indent_stack.push(indent);
            self.tokens
                .push(Token::new(TokenKind::Indent, Span::new(start, self.current_pos)));
        } else if indent < current_indent {
            let mut count = 0;
            while self.indent_stack.last().is_some_and(|&top| indent < top) {
                self.indent_stack.pop();
                count += 1;
            }
            if self.indent_stack.is_empty() {
                self.indent_stack.push(0);
            }

            // Verify we landed on a valid indent level
            let final_indent = *self.indent_stack.last().unwrap_or(&0);
            if indent != final_indent {
                self.errors.push(CompileError::new(
                    format!(
                        "Inconsistent indentation: unindent to {} columns does not match any outer level (nearest is {})",
                        indent, final_indent
                    ),
                    Span::new(start, self.current_pos),
                ));
            }

            if count > 0 {
                self.tokens
                    .push(Token::new(TokenKind::Dedent, Span::new(start, self.current_pos)));
                self.pending_dedents = count - 1;
            }
        }

        self.at_line_start = false;
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn count(tokens: &[crate::lexer::Token], kind: TokenKind) -> usize {
        tokens.iter().filter(|t| t.kind == kind).count()
    }

    #[test]
    fn test_indentation() {
        let source = "def foo():\n    x = 1\n    y = 2\nx = 3\n";
        let tokens = lex(source).unwrap();
        assert_eq!(count(&tokens, TokenKind::Indent), 1);
        assert_eq!(count(&tokens, TokenKind::Dedent), 1);
    }

    #[test]
    fn test_multiple_dedents() {
        let source = "if a:\n    if b:\n        pass\nx\n";
        let tokens = lex(source).unwrap();
        assert_eq!(count(&tokens, TokenKind::Indent), 2);
        assert_eq!(count(&tokens, TokenKind::Dedent), 2);
        // Both dedents sit between the NEWLINE after `pass` and `x`.
        let x = tokens
            .iter()
            .position(|t| t.kind == TokenKind::Ident("x".to_string()))
            .unwrap();
        assert_eq!(tokens[x - 1].kind, TokenKind::Dedent);
        assert_eq!(tokens[x - 2].kind, TokenKind::Dedent);
        assert_eq!(tokens[x - 3].kind, TokenKind::Newline);
    }

    #[test]
    fn test_dedents_at_eof() {
        let tokens = lex("while x:\n    pass").unwrap();
        let kinds: Vec<_> = tokens.iter().rev().take(3).map(|t| t.kind.clone()).collect();
        assert_eq!(kinds, vec![TokenKind::Eof, TokenKind::Dedent, TokenKind::Newline]);
    }

    #[test]
    fn test_comment_and_blank_lines_keep_level() {
        let source = "if a:\n    x\n\n  # note\n    y\n";
        let tokens = lex(source).unwrap();
        assert_eq!(count(&tokens, TokenKind::Indent), 1);
        assert_eq!(count(&tokens, TokenKind::Newline), 3);
    }

    #[test]
    fn test_tab_rounds_to_tab_stop() {
        // One tab equals eight spaces.
        let source = "if a:\n\tx\n        y\n";
        let tokens = lex(source).unwrap();
        assert_eq!(count(&tokens, TokenKind::Indent), 1);
    }

    #[test]
    fn test_inconsistent_dedent() {
        let errors = lex("if a:\n    x\n  y\n").unwrap_err();
        assert!(errors[0].message.starts_with("Inconsistent indentation"));
    }
}
