//! Runtime prelude injected into every generated renderer.
//!
//! The prelude is plain ES5 with no free identifiers besides JS built-ins
//! (`Object`, `String`, `Date`, `Error`, `isFinite`, `encodeURIComponent`).
//! Its helpers are the runtime copies of [`crate::filters`],
//! [`crate::stringify`] and [`crate::utils::quote_string_literal`].
//!
//! `$version` holds [`VERSION_PLACEHOLDER`]. Build tooling substitutes it with
//! [`stamp_version`]; nothing in this crate does so on its own.

use std::sync::OnceLock;

use regex::Regex;

use crate::PreludeError;

/// Token replaced with a build identifier by [`stamp_version`].
pub const VERSION_PLACEHOLDER: &str = "##version##";

/// The prelude statement that carries [`VERSION_PLACEHOLDER`].
const VERSION_DECLARATION: &str = "var $version = '##version##';";

/// Name of the output accumulator inside generated renderers.
pub const ACCUMULATOR: &str = "html";

/// Name of the renderer's single parameter, the data-binding context.
pub const DATA_PARAM: &str = "data";

/// Opens the renderer function and declares the accumulator.
pub const RENDERER_OPEN: &str = "function (data) {\nvar html = \"\";";

/// Returns the accumulator and closes the renderer function.
pub const RENDERER_CLOSE: &str = "return html;\n}";

/// Runtime helper source, emitted verbatim after [`RENDERER_OPEN`].
pub const RUNTIME_SOURCE: &str = r#"var $version = '##version##';

var componentRenderers = {};

function extend(target, source) {
    if (source) {
        Object.keys(source).forEach(function (key) {
            var value = source[key];
            if (typeof value !== 'undefined') {
                target[key] = value;
            }
        });
    }

    return target;
}

function each(array, iterator) {
    if (array && array.length > 0) {
        for (var i = 0, l = array.length; i < l; i++) {
            if (iterator(array[i], i) === false) {
                break;
            }
        }
    }
}

function contains(array, value) {
    var result = false;
    each(array, function (item) {
        result = item === value;
        return !result;
    });

    return result;
}

var HTML_ENTITY = {
    '&': '&amp;',
    '<': '&lt;',
    '>': '&gt;',
    '"': '&quot;',
    "'": '&#39;'
};

function htmlFilterReplacer(c) {
    return HTML_ENTITY[c];
}

function escapeHTML(source) {
    if (source == null) {
        return '';
    }

    return String(source).replace(/[&<>"']/g, htmlFilterReplacer);
}

var DEFAULT_FILTERS = {
    url: encodeURIComponent,
    _class: function (source) {
        if (source instanceof Array) {
            return source.join(' ');
        }

        return source;
    },
    _style: function (source) {
        if (typeof source === 'object') {
            var result = '';
            if (source) {
                Object.keys(source).forEach(function (key) {
                    result += key + ':' + source[key] + ';';
                });
            }

            return result;
        }

        return source || '';
    },
    _sep: function (source, sep) {
        return source ? sep + source : '';
    }
};

function attrFilter(name, value) {
    if (value) {
        return ' ' + name + '="' + value + '"';
    }

    return '';
}

function boolAttrFilter(name, value) {
    if (value && value !== 'false' && value !== '0') {
        return ' ' + name;
    }

    return '';
}

function stringLiteralize(source) {
    return '"'
        + source
            .replace(/\x5C/g, '\\\\')
            .replace(/"/g, '\\"')
            .replace(/\x0A/g, '\\n')
            .replace(/\x09/g, '\\t')
            .replace(/\x0D/g, '\\r')
        + '"';
}

var stringifier = {
    obj: function (source, path) {
        var prefixComma;
        var result = '{';

        Object.keys(source).forEach(function (key) {
            if (typeof source[key] === 'undefined') {
                return;
            }

            if (prefixComma) {
                result += ',';
            }
            prefixComma = 1;

            result += stringLiteralize(key) + ':' + stringifier.any(source[key], path);
        });

        return result + '}';
    },

    arr: function (source, path) {
        var result = '[';

        for (var i = 0, l = source.length; i < l; i++) {
            if (i > 0) {
                result += ',';
            }

            result += stringifier.any(source[i], path);
        }

        return result + ']';
    },

    str: function (source) {
        return stringLiteralize(source);
    },

    num: function (source) {
        if (!isFinite(source)) {
            throw new Error('Cannot stringify non-finite number: ' + source);
        }

        return '' + source;
    },

    date: function (source) {
        return 'new Date(' + stringifier.num(source.getTime()) + ')';
    },

    any: function (source, path) {
        switch (typeof source) {
            case 'string':
                return stringifier.str(source);

            case 'number':
                return stringifier.num(source);

            case 'boolean':
                return source ? 'true' : 'false';

            case 'undefined':
                return 'null';

            case 'object':
                if (!source) {
                    return 'null';
                }

                if (source instanceof Date) {
                    return stringifier.date(source);
                }

                path = path || [];
                if (contains(path, source)) {
                    throw new Error('Cannot stringify cyclic structure');
                }

                path.push(source);
                var result = source instanceof Array
                    ? stringifier.arr(source, path)
                    : stringifier.obj(source, path);
                path.pop();

                return result;
        }

        throw new Error('Cannot stringify ' + typeof source + ': ' + String(source));
    }
};"#;

/// Stamp `version` into every prelude `$version` declaration in `code`.
///
/// Only the `var $version = '##version##';` statement is rewritten. A
/// placeholder anywhere else, such as inside literal template text, is left
/// as written. The version lands inside a single-quoted JS string, so it is
/// restricted to `[0-9A-Za-z][0-9A-Za-z._+-]*`.
pub fn stamp_version(code: &str, version: &str) -> Result<String, PreludeError> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE.get_or_init(|| {
        Regex::new(r"^[0-9A-Za-z][0-9A-Za-z._+-]*$").expect("version pattern is valid")
    });

    if !re.is_match(version) {
        return Err(PreludeError::InvalidVersion(version.to_string()));
    }

    let occurrences = code.matches(VERSION_DECLARATION).count();
    if occurrences == 0 {
        return Err(PreludeError::MissingVersionPlaceholder);
    }

    tracing::debug!(version, occurrences, "stamping renderer version");
    let stamped = VERSION_DECLARATION.replace(VERSION_PLACEHOLDER, version);
    Ok(code.replace(VERSION_DECLARATION, &stamped))
}
