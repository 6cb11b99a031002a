use serde::{Deserialize, Serialize};

/// A name with one or more values: the shape MockServer uses for headers and query string
/// parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValues {
    pub name: String,
    pub values: Vec<String>,
}

impl KeyValues {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }
}

/// A single cookie, as MockServer expects it in both request matchers and responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The partial description of an HTTP request MockServer matches incoming requests against.
///
/// Every field left empty acts as a wildcard: a `RequestMatcher` with only a `path` matches any
/// method, any body, any header set.
/// The serialized document always carries all six keys - MockServer expects a fully-shaped one.
///
/// ### Example:
/// ```rust
/// use mockserver_client::RequestMatcher;
///
/// let matcher = RequestMatcher::new("/orders")
///     .method("post")
///     .header("Authorization", "Bearer 1234")
///     .query_parameter("page", "2");
///
/// assert_eq!(matcher.method, "POST");
/// assert_eq!(matcher.headers[0].values, vec!["Bearer 1234"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMatcher {
    pub method: String,
    pub path: String,
    pub body: String,
    pub headers: Vec<KeyValues>,
    pub cookies: Vec<Cookie>,
    pub query_string_parameters: Vec<KeyValues>,
}

impl RequestMatcher {
    /// A matcher on `path` alone. `path` is not validated: any string, including an empty one,
    /// is forwarded as is.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<String>,
    {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Only match requests using `method`. The method name is upper-cased.
    pub fn method<T>(mut self, method: T) -> Self
    where
        T: AsRef<str>,
    {
        self.method = method.as_ref().to_ascii_uppercase();
        self
    }

    /// Only match requests whose body is exactly `body`.
    pub fn body<T>(mut self, body: T) -> Self
    where
        T: Into<String>,
    {
        self.body = body.into();
        self
    }

    /// Require a header. Calling it twice with the same name (case-insensitive) adds a value to
    /// the existing entry instead of creating a second one.
    pub fn header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        append_value(&mut self.headers, name.into(), value.into(), true);
        self
    }

    /// Require a cookie.
    pub fn cookie<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.cookies.push(Cookie::new(name, value));
        self
    }

    /// Require a query string parameter. Parameter names are case-sensitive.
    pub fn query_parameter<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        append_value(
            &mut self.query_string_parameters,
            name.into(),
            value.into(),
            false,
        );
        self
    }
}

pub(crate) fn append_value(
    entries: &mut Vec<KeyValues>,
    name: String,
    value: String,
    ignore_case: bool,
) {
    let existing = entries.iter_mut().find(|entry| {
        if ignore_case {
            entry.name.eq_ignore_ascii_case(&name)
        } else {
            entry.name == name
        }
    });
    match existing {
        Some(entry) => entry.values.push(value),
        None => entries.push(KeyValues {
            name,
            values: vec![value],
        }),
    }
}
