//! Structural class discovery.
//!
//! Walks the token stream of one file, tracking `namespace` and `use`
//! statements, and records every `class`, `interface` and `trait` declaration
//! with its parent, interfaces, traits, constants and declared properties.
//! Method bodies are skipped without being looked at.

use std::path::Path;

use super::{
    Cursor, NameResolver,
    expr::parse_expr,
    lexer::{TokenKind, tokenize},
};
use crate::core::{
    data::{ClassDescriptor, ClassKind, ConstantDescriptor, PropertyDescriptor},
    error::ParseError,
};

/// Parse a PHP source file and return the classes it declares, in source order.
pub fn parse_classes(source: &str, file_path: &Path) -> Result<Vec<ClassDescriptor>, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = ClassParser {
        cursor: Cursor::new(&tokens),
        names: NameResolver::default(),
        file_path,
        classes: Vec::new(),
    };
    parser.parse()?;
    Ok(parser.classes)
}

struct ClassParser<'a> {
    cursor: Cursor<'a>,
    names: NameResolver,
    file_path: &'a Path,
    classes: Vec<ClassDescriptor>,
}

impl<'a> ClassParser<'a> {
    fn parse(&mut self) -> Result<(), ParseError> {
        while let Some(token) = self.cursor.peek() {
            let TokenKind::Name(name) = token else {
                self.cursor.bump();
                continue;
            };
            let follows_name = matches!(self.cursor.peek_nth(1), Some(TokenKind::Name(_)));
            match name.to_ascii_lowercase().as_str() {
                "namespace" => self.parse_namespace()?,
                "use" => self.parse_use()?,
                "class" if follows_name && !self.is_class_reference() => {
                    self.parse_class(ClassKind::Class)?
                }
                "interface" if follows_name => self.parse_class(ClassKind::Interface)?,
                "trait" if follows_name => self.parse_class(ClassKind::Trait)?,
                "enum" if follows_name => self.skip_declaration()?,
                _ => {
                    self.cursor.bump();
                }
            }
        }
        Ok(())
    }

    /// `Foo::class`, `new class` and `$obj->class` are not declarations.
    fn is_class_reference(&self) -> bool {
        match self.cursor.previous() {
            Some(TokenKind::Symbol("::" | "->" | "?->")) => true,
            Some(TokenKind::Name(n)) => n.eq_ignore_ascii_case("new"),
            _ => false,
        }
    }

    fn parse_namespace(&mut self) -> Result<(), ParseError> {
        self.cursor.bump();
        match self.cursor.peek() {
            Some(TokenKind::Name(name)) => {
                self.names.enter_namespace(name);
                self.cursor.bump();
            }
            Some(TokenKind::Symbol("{")) => self.names.enter_namespace(""),
            _ => return Err(self.cursor.error("expected namespace name")),
        }
        // Block form: the body is walked by the main loop.
        if !self.cursor.eat_symbol("{") {
            self.cursor.expect_symbol(";")?;
        }
        Ok(())
    }

    fn parse_use(&mut self) -> Result<(), ParseError> {
        self.cursor.bump();
        // Closure `use (...)` list.
        if self.cursor.is_symbol("(") {
            return Ok(());
        }
        if self.cursor.is_keyword("function") || self.cursor.is_keyword("const") {
            return self.skip_statement();
        }
        loop {
            let Some(name) = self.cursor.eat_name() else {
                return Err(self.cursor.error("expected name in use statement"));
            };
            if self.cursor.eat_symbol("\\") {
                self.parse_group_use(name)?;
            } else {
                let alias = self.parse_alias()?;
                self.names.import(name, alias);
            }
            if self.cursor.eat_symbol(",") {
                continue;
            }
            return self.cursor.expect_symbol(";");
        }
    }

    /// `use Prefix\{A, B as C};`
    fn parse_group_use(&mut self, prefix: &str) -> Result<(), ParseError> {
        self.cursor.expect_symbol("{")?;
        loop {
            if self.cursor.eat_symbol("}") {
                return Ok(());
            }
            let is_class_import =
                !(self.cursor.eat_keyword("function") || self.cursor.eat_keyword("const"));
            let Some(name) = self.cursor.eat_name() else {
                return Err(self.cursor.error("expected name in group use"));
            };
            let alias = self.parse_alias()?;
            if is_class_import {
                self.names
                    .import(&format!("{}\\{}", prefix, name), alias);
            }
            if !self.cursor.eat_symbol(",") {
                return self.cursor.expect_symbol("}");
            }
        }
    }

    fn parse_alias(&mut self) -> Result<Option<&'a str>, ParseError> {
        if !self.cursor.eat_keyword("as") {
            return Ok(None);
        }
        match self.cursor.eat_name() {
            Some(alias) => Ok(Some(alias)),
            None => Err(self.cursor.error("expected alias after 'as'")),
        }
    }

    fn skip_statement(&mut self) -> Result<(), ParseError> {
        loop {
            match self.cursor.peek() {
                None => return Err(self.cursor.error("unexpected end of file")),
                Some(TokenKind::Symbol(";")) => {
                    self.cursor.bump();
                    return Ok(());
                }
                Some(TokenKind::Symbol("(" | "[" | "{") | TokenKind::AttributeStart) => {
                    self.cursor.skip_balanced()?
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// Skip an enum up to and including its body.
    fn skip_declaration(&mut self) -> Result<(), ParseError> {
        while !self.cursor.is_symbol("{") {
            if self.cursor.bump().is_none() {
                return Err(self.cursor.error("expected declaration body"));
            }
        }
        self.cursor.skip_balanced()
    }

    fn parse_class(&mut self, kind: ClassKind) -> Result<(), ParseError> {
        let line = self.cursor.line();
        self.cursor.bump();
        let Some(short_name) = self.cursor.eat_name() else {
            return Err(self.cursor.error("expected class name"));
        };
        let mut class = ClassDescriptor {
            kind,
            name: self.names.qualify(short_name),
            file_path: self.file_path.to_path_buf(),
            parent: None,
            interfaces: Vec::new(),
            traits: Vec::new(),
            constants: Vec::new(),
            properties: Vec::new(),
        };

        loop {
            match self.cursor.peek() {
                None => return Err(ParseError::new(line, "class declaration without a body")),
                Some(TokenKind::Symbol("{")) => break,
                // Interfaces extend other interfaces, possibly several.
                Some(TokenKind::Name(n))
                    if n.eq_ignore_ascii_case("extends") && kind == ClassKind::Interface =>
                {
                    self.cursor.bump();
                    class.interfaces = self.parse_name_list()?;
                }
                Some(TokenKind::Name(n)) if n.eq_ignore_ascii_case("extends") => {
                    self.cursor.bump();
                    let Some(parent) = self.cursor.eat_name() else {
                        return Err(self.cursor.error("expected parent class name"));
                    };
                    class.parent = Some(self.names.resolve(parent));
                }
                Some(TokenKind::Name(n)) if n.eq_ignore_ascii_case("implements") => {
                    self.cursor.bump();
                    class.interfaces = self.parse_name_list()?;
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
        self.cursor.bump();

        self.parse_class_body(&mut class, line)?;
        self.classes.push(class);
        Ok(())
    }

    /// `A, B\C, \D`, resolved against the current namespace and imports.
    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = Vec::new();
        loop {
            let Some(name) = self.cursor.eat_name() else {
                return Err(self.cursor.error("expected name"));
            };
            names.push(self.names.resolve(name));
            if !self.cursor.eat_symbol(",") {
                return Ok(names);
            }
        }
    }

    fn parse_class_body(
        &mut self,
        class: &mut ClassDescriptor,
        line: usize,
    ) -> Result<(), ParseError> {
        let mut is_static = false;
        loop {
            let Some(token) = self.cursor.peek() else {
                return Err(ParseError::new(line, "unterminated class body"));
            };
            match token {
                TokenKind::Symbol("}") => {
                    self.cursor.bump();
                    return Ok(());
                }
                TokenKind::AttributeStart => self.cursor.skip_balanced()?,
                TokenKind::Variable(_) => {
                    self.parse_properties(class, is_static)?;
                    is_static = false;
                }
                TokenKind::Name(name) => match name.to_ascii_lowercase().as_str() {
                    "static" => {
                        is_static = true;
                        self.cursor.bump();
                    }
                    "const" => {
                        self.cursor.bump();
                        self.parse_constants(class)?;
                        is_static = false;
                    }
                    "function" => {
                        self.cursor.bump();
                        self.skip_method()?;
                        is_static = false;
                    }
                    "use" => {
                        self.cursor.bump();
                        let traits = self.parse_name_list()?;
                        class.traits.extend(traits);
                        self.skip_trait_use()?;
                        is_static = false;
                    }
                    // Modifiers and property types.
                    _ => {
                        self.cursor.bump();
                    }
                },
                TokenKind::Symbol(";") => {
                    self.cursor.bump();
                    is_static = false;
                }
                TokenKind::Symbol("{") => return Err(self.cursor.error("unexpected '{'")),
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    fn parse_constants(&mut self, class: &mut ClassDescriptor) -> Result<(), ParseError> {
        loop {
            // Typed constants put the type first; the name is the last one before '='.
            let mut constant_name = None;
            while let Some(name) = self.cursor.eat_name() {
                constant_name = Some(name);
            }
            let Some(name) = constant_name else {
                return Err(self.cursor.error("expected constant name"));
            };
            self.cursor.expect_symbol("=")?;
            let value = parse_expr(&mut self.cursor, &self.names)?;
            class.constants.push(ConstantDescriptor {
                name: name.to_string(),
                value,
            });
            if self.cursor.eat_symbol(",") {
                continue;
            }
            return self.cursor.expect_symbol(";");
        }
    }

    fn parse_properties(
        &mut self,
        class: &mut ClassDescriptor,
        is_static: bool,
    ) -> Result<(), ParseError> {
        loop {
            let Some(TokenKind::Variable(name)) = self.cursor.bump() else {
                return Err(self.cursor.error("expected property name"));
            };
            let default = if self.cursor.eat_symbol("=") {
                Some(parse_expr(&mut self.cursor, &self.names)?)
            } else {
                None
            };
            class.properties.push(PropertyDescriptor {
                name: name.clone(),
                is_static,
                default,
            });
            if self.cursor.eat_symbol(",") {
                continue;
            }
            // Property hooks.
            if self.cursor.is_symbol("{") {
                return self.cursor.skip_balanced();
            }
            return self.cursor.expect_symbol(";");
        }
    }

    /// Skip a method signature and its body (or the `;` of an abstract method).
    fn skip_method(&mut self) -> Result<(), ParseError> {
        loop {
            match self.cursor.peek() {
                None => return Err(self.cursor.error("unterminated method declaration")),
                Some(TokenKind::Symbol(";")) => {
                    self.cursor.bump();
                    return Ok(());
                }
                Some(TokenKind::Symbol("{")) => return self.cursor.skip_balanced(),
                Some(TokenKind::Symbol("(" | "[") | TokenKind::AttributeStart) => {
                    self.cursor.skip_balanced()?
                }
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// The `;` or the `{ foo as bar; }` adaptation block after a trait list.
    fn skip_trait_use(&mut self) -> Result<(), ParseError> {
        loop {
            match self.cursor.peek() {
                None => return Err(self.cursor.error("unterminated trait use")),
                Some(TokenKind::Symbol(";")) => {
                    self.cursor.bump();
                    return Ok(());
                }
                Some(TokenKind::Symbol("{")) => return self.cursor.skip_balanced(),
                Some(_) => {
                    self.cursor.bump();
                }
            }
        }
    }
}
