//! In-process snippet evaluation with QuickJS
//!
//! Every snippet gets a brand-new QuickJS context, seeded with a small
//! markup component library (`Div`, `P`, `A`, `Card`, ...) and the
//! `set_output` function.

use quick_js::{Context, ExecutionError, JsValue};
use serde::Deserialize;

use super::{Evaluator, ExecError};

/// Component library and output plumbing available to every snippet
const PRELUDE: &str = r#"
var __has_output = false;
var __output;

function set_output(value) {
    __output = value;
    __has_output = true;
}

function __escape(s) {
    return String(s)
        .replace(/&/g, "&amp;")
        .replace(/</g, "&lt;")
        .replace(/>/g, "&gt;")
        .replace(/"/g, "&quot;");
}

function __Raw(html) { this.html = html; }
__Raw.prototype.toHtml = function () { return this.html; };

function __Element(tag, children, attrs, isVoid) {
    this.tag = tag;
    this.children = children;
    this.attrs = attrs;
    this.isVoid = isVoid;
}

function __attrName(key) {
    if (key === 'cls' || key === 'klass') return 'class';
    if (key === '_for' || key === 'fr') return 'for';
    return key.replace(/_/g, '-');
}

function __child(c) {
    if (c === null || c === undefined || c === false) return '';
    if (Array.isArray(c)) return c.map(__child).join('');
    if (c instanceof __Element || c instanceof __Raw) return c.toHtml();
    return __escape(c);
}

__Element.prototype.toHtml = function () {
    var html = '<' + this.tag;
    for (var key in this.attrs) {
        var value = this.attrs[key];
        if (value === false || value === null || value === undefined) continue;
        var name = __attrName(key);
        html += value === true ? ' ' + name : ' ' + name + '="' + __escape(value) + '"';
    }
    html += '>';
    if (this.isVoid) return html;
    for (var i = 0; i < this.children.length; i++) html += __child(this.children[i]);
    return html + '</' + this.tag + '>';
};

function __isAttrs(v) {
    return v !== null && typeof v === 'object' && !Array.isArray(v)
        && !(v instanceof __Element) && !(v instanceof __Raw);
}

function __component(tag, isVoid, baseClass) {
    return function () {
        var args = Array.prototype.slice.call(arguments);
        var attrs = args.length && __isAttrs(args[args.length - 1]) ? args.pop() : {};
        if (baseClass) {
            var extra = attrs.cls || attrs['class'];
            delete attrs['class'];
            attrs.cls = extra ? baseClass + ' ' + extra : baseClass;
        }
        return new __Element(tag, args, attrs, !!isVoid);
    };
}

var Div = __component('div'), P = __component('p'), Span = __component('span'),
    A = __component('a'), H1 = __component('h1'), H2 = __component('h2'),
    H3 = __component('h3'), H4 = __component('h4'), Ul = __component('ul'),
    Ol = __component('ol'), Li = __component('li'), Strong = __component('strong'),
    Em = __component('em'), Code = __component('code'), Pre = __component('pre'),
    Button = __component('button'), Table = __component('table'),
    Thead = __component('thead'), Tbody = __component('tbody'), Tr = __component('tr'),
    Td = __component('td'), Th = __component('th'), Section = __component('section'),
    Article = __component('article'), Label = __component('label'),
    Form = __component('form'), Blockquote = __component('blockquote'),
    Img = __component('img', true), Br = __component('br', true),
    Hr = __component('hr', true), Input = __component('input', true);

var Card = __component('div', false, 'uk-card uk-card-default uk-card-body');
var Alert = __component('div', false, 'uk-alert');
var DivVStacked = __component('div', false, 'flex flex-col items-center');
var DivLAligned = __component('div', false, 'flex items-center');

function NotStr(html) { return new __Raw(String(html)); }

function __describe(e) {
    if (e instanceof Error) return e.name + ': ' + e.message;
    return String(e);
}

function __render(v) {
    if (v === null || v === undefined) return '';
    if (typeof v === 'string') return v;
    if (typeof v === 'number' || typeof v === 'boolean') return String(v);
    if (Array.isArray(v)) return v.map(__render).join('');
    if (typeof v.toHtml === 'function') return String(v.toHtml());
    throw new TypeError(Object.prototype.toString.call(v) + ' has no markup representation');
}
"#;

/// What the reporter script hands back
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Output(Option<String>),
    Unrenderable(String),
}

/// Evaluates snippets as JavaScript in a fresh QuickJS context each time
#[derive(Debug, Default, Clone)]
pub struct QuickJsEvaluator;

/// Runs after the snippet, in the same context. Global `let`/`const`
/// bindings of the snippet script are visible here. A `_result` binding
/// counts as output unless `set_output` was called.
const REPORTER: &str = r#"(function () {
    if (!__has_output && typeof _result !== 'undefined') set_output(_result);
    if (!__has_output) return JSON.stringify({ output: null });
    try {
        return JSON.stringify({ output: __render(__output) });
    } catch (e) {
        return JSON.stringify({ unrenderable: __describe(e) });
    }
})()"#;

impl QuickJsEvaluator {
    pub fn new() -> Self {
        Self
    }
}

/// Message of an exception thrown by a snippet
fn describe_exception(error: ExecutionError) -> String {
    match error {
        ExecutionError::Exception(JsValue::String(message)) => message,
        ExecutionError::Exception(other) => format!("{:?}", other),
        other => other.to_string(),
    }
}

impl Evaluator for QuickJsEvaluator {
    fn name(&self) -> &'static str {
        "quickjs"
    }

    fn listing_language(&self) -> Option<&str> {
        Some("javascript")
    }

    fn evaluate(&self, code: &str) -> Result<Option<String>, ExecError> {
        let context = Context::new()
            .map_err(|e| ExecError::Engine(format!("Failed to create JS context: {:?}", e)))?;

        context
            .eval(PRELUDE)
            .map_err(|e| ExecError::Engine(format!("Failed to load prelude: {:?}", e)))?;

        // The snippet is a script of its own so its top-level declarations
        // land in the global scope. Its completion value is not used, and
        // one that cannot be converted to a Rust value is not an error.
        match context.eval(code) {
            Ok(_) | Err(ExecutionError::Conversion(_)) => {}
            Err(ExecutionError::OutOfMemory) => {
                return Err(ExecError::Engine("out of memory".to_string()))
            }
            Err(e) => return Err(ExecError::Script(describe_exception(e))),
        }

        let report = match context.eval(REPORTER) {
            Ok(JsValue::String(s)) => s,
            Ok(other) => {
                return Err(ExecError::Engine(format!(
                    "unexpected snippet report: {:?}",
                    other
                )))
            }
            Err(e) => return Err(ExecError::Engine(format!("JS execution error: {:?}", e))),
        };

        let outcome: Outcome =
            serde_json::from_str(&report).map_err(|e| ExecError::Engine(e.to_string()))?;

        match outcome {
            Outcome::Output(output) => Ok(output),
            Outcome::Unrenderable(message) => Err(ExecError::Serialization(message)),
        }
    }
}
