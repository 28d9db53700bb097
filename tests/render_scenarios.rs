//! Rendering behaviour of registered statements against argument objects

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use sqlmap::model::{ModelList, Object};
use sqlmap::{Charset, Dao, EscapeError, Escaper, NavError, RenderError, StatementRegistry};

/// Escaper that records every value it is handed and wraps it in `<>`
#[derive(Default)]
struct CountingEscaper {
    calls: Arc<AtomicUsize>,
}

impl Escaper for CountingEscaper {
    fn escape(&self, _: Charset, raw: &str) -> Result<String, EscapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("<{}>", raw))
    }
}

fn dao_with(statements: &[(&str, &str)]) -> Dao {
    let mut registry = StatementRegistry::new();
    for (name, template) in statements {
        registry.register(*name, template).expect("Should register");
    }
    Dao::new(registry.freeze())
}

fn find_dao() -> Dao {
    dao_with(&[("find", "WHERE id = #{id} AND tags IN ${tags}")])
}

#[test]
fn test_find_with_tags() {
    let arg = Object::new()
        .with_tag("query")
        .with_plain("id", 7i64)
        .with_list("tags", ModelList::from(vec!["a", "b"]));

    let sql = find_dao().render("find", &[&arg]).unwrap();
    insta::assert_snapshot!(sql, @"WHERE id = 7 AND tags IN ('a','b')");
}

#[test]
fn test_find_with_empty_tags() {
    let arg = Object::new()
        .with_tag("query")
        .with_plain("id", 7i64)
        .with_list("tags", ModelList::new());

    let sql = find_dao().render("find", &[&arg]).unwrap();
    assert_eq!(sql, "WHERE id = 7 AND tags IN ()");
}

#[test]
fn test_literal_template_unchanged() {
    let dao = dao_with(&[("all", "SELECT * FROM user ORDER BY id")]);
    let a = Object::new().with_plain("x", 1i32);
    let b = Object::new().with_tag("b");

    assert_eq!(dao.render("all", &[]).unwrap(), "SELECT * FROM user ORDER BY id");
    assert_eq!(dao.render("all", &[&a]).unwrap(), "SELECT * FROM user ORDER BY id");
    assert_eq!(dao.render("all", &[&a, &b]).unwrap(), "SELECT * FROM user ORDER BY id");
}

#[test]
fn test_scalar_kinds_quoting() {
    let dao = dao_with(&[(
        "q",
        "#{i16},#{u64},#{flag},#{ratio},#{letter},#{text}",
    )]);
    let arg = Object::new()
        .with_plain("i16", -3i16)
        .with_plain("u64", 18u64)
        .with_plain("flag", false)
        .with_plain("ratio", 0.25f64)
        .with_plain("letter", 'x')
        .with_plain("text", "a\"b");

    let sql = dao.render("q", &[&arg]).unwrap();
    assert_eq!(sql, "-3,18,0,0.25,'x','a\\\"b'");
}

#[test]
fn test_bare_scalars_skip_escaper() {
    let escaper = CountingEscaper::default();
    let calls = Arc::clone(&escaper.calls);
    let dao = dao_with(&[("q", "#{a} #{b} #{c} #{d} #{e}")]).with_escaper(escaper);
    let arg = Object::new()
        .with_plain("a", 1i32)
        .with_plain("b", true)
        .with_plain("c", 1.5f64)
        .with_plain("d", 2u16)
        .with_plain("e", 0.5f32);

    assert_eq!(dao.render("q", &[&arg]).unwrap(), "1 1 1.5 2 0.5");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_escaper_runs_once_per_text_field_and_list_element() {
    let escaper = CountingEscaper::default();
    let calls = Arc::clone(&escaper.calls);
    let dao =
        dao_with(&[("q", "#{name} IN ${ids} AND ${flags} AND ${none}")]).with_escaper(escaper);
    let arg = Object::new()
        .with_plain("name", "ada")
        .with_list("ids", ModelList::from(vec![1i64, 2, 3]))
        .with_list("flags", ModelList::from(vec![true]))
        .with_list("none", ModelList::new());

    assert_eq!(
        dao.render("q", &[&arg]).unwrap(),
        "'<ada>' IN ('<1>','<2>','<3>') AND ('<1>') AND ()"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_non_finite_float_field_fails() {
    let dao = dao_with(&[("q", "x = #{f}")]);
    let arg = Object::new().with_plain("f", f64::NEG_INFINITY);
    let err = dao.render("q", &[&arg]).unwrap_err();
    assert_eq!(
        err,
        RenderError::Navigation {
            method: "q".to_string(),
            path: "f".to_string(),
            source: NavError::NonFinite {
                text: "-inf".to_string()
            },
        }
    );
}

#[test]
fn test_list_elements_always_quoted_and_escaped() {
    let dao = dao_with(&[("q", "IN ${ids} OR name IN ${names}")]);
    let arg = Object::new()
        .with_list("ids", ModelList::from(vec![1i32, 2]))
        .with_list("names", ModelList::from(vec!["it's"]));

    let sql = dao.render("q", &[&arg]).unwrap();
    assert_eq!(sql, "IN ('1','2') OR name IN ('it\\'s')");
}

#[test]
fn test_single_argument_ignores_tag_section() {
    // With one argument, the first section is a member name, not a tag
    let dao = dao_with(&[("q", "status = #{status}")]);
    let arg = Object::new().with_tag("filter").with_plain("status", 2i32);
    assert_eq!(dao.render("q", &[&arg]).unwrap(), "status = 2");

    let tagged = dao_with(&[("q", "status = #{filter.status}")]);
    let err = tagged.render("q", &[&arg]).unwrap_err();
    assert_eq!(
        err.nav_error(),
        Some(&NavError::UnknownMember {
            section: "filter".to_string()
        })
    );
}

#[test]
fn test_multi_argument_selects_by_tag() {
    let dao = dao_with(&[("q", "status = #{filter.status} AND owner = #{user.name}")]);
    let user = Object::new()
        .with_tag("user")
        .with_plain("name", "ada")
        .with_plain("status", 9i32);
    let filter = Object::new().with_tag("filter").with_plain("status", 2i32);

    let sql = dao.render("q", &[&user, &filter]).unwrap();
    assert_eq!(sql, "status = 2 AND owner = 'ada'");
}

#[test]
fn test_multi_argument_missing_tag() {
    let dao = dao_with(&[("q", "status = #{filter.status}")]);
    let user = Object::new().with_tag("user").with_plain("status", 9i32);
    let other = Object::new().with_tag("paging").with_plain("size", 10i32);

    let err = dao.render("q", &[&user, &other]).unwrap_err();
    assert_eq!(
        err,
        RenderError::Navigation {
            method: "q".to_string(),
            path: "filter.status".to_string(),
            source: NavError::UnknownTag {
                tag: "filter".to_string()
            },
        }
    );
}

#[test]
fn test_tag_collision_first_wins() {
    let dao = dao_with(&[("q", "v = #{t.v} AND w = #{other.w}")]);
    let first = Object::new().with_tag("t").with_plain("v", 1i32);
    let second = Object::new().with_tag("t").with_plain("v", 2i32);
    let other = Object::new().with_tag("other").with_plain("w", 3i32);

    let with_collision = dao.render("q", &[&first, &second, &other]).unwrap();
    let without = dao.render("q", &[&first, &other]).unwrap();
    assert_eq!(with_collision, without);
    assert_eq!(with_collision, "v = 1 AND w = 3");
}

#[test]
fn test_removed_member_fails_instead_of_omitting() {
    let dao = dao_with(&[("q", "a = #{a} AND b = #{b}")]);
    let full = Object::new().with_plain("a", 1i32).with_plain("b", 2i32);
    assert_eq!(dao.render("q", &[&full]).unwrap(), "a = 1 AND b = 2");

    let partial = Object::new().with_plain("a", 1i32).with_plain("c", 2i32);
    let err = dao.render("q", &[&partial]).unwrap_err();
    assert!(matches!(
        err.nav_error(),
        Some(NavError::UnknownMember { .. })
    ));
}

#[test]
fn test_nested_and_indexed_paths() {
    let dao = dao_with(&[(
        "q",
        concat!(
            "city = #{user.address.city} AND first = #{user.orders[0].id} ",
            "AND skus IN ${user.orders.[1].skus}"
        ),
    )]);
    let order = |id: i64, skus: Vec<&str>| {
        Object::new()
            .with_plain("id", id)
            .with_list("skus", ModelList::from(skus))
    };
    let user = Object::new()
        .with_tag("user")
        .with_object("address", Object::new().with_plain("city", "Oslo"))
        .with_list(
            "orders",
            ModelList::from(vec![order(10, vec!["a"]), order(11, vec!["b", "c"])]),
        );
    let paging = Object::new().with_tag("paging");

    let sql = dao.render("q", &[&user, &paging]).unwrap();
    assert_eq!(
        sql,
        "city = 'Oslo' AND first = 10 AND skus IN ('b','c')"
    );
}

#[test]
fn test_unknown_method() {
    let err = find_dao().render("nope", &[]).unwrap_err();
    assert!(matches!(err, RenderError::UnknownMethod { .. }));
}

#[test]
fn test_renders_from_several_threads() {
    let dao = find_dao();
    let handles: Vec<_> = (0..4i64)
        .map(|id| {
            let dao = dao.clone();
            std::thread::spawn(move || {
                let arg = Object::new()
                    .with_plain("id", id)
                    .with_list("tags", ModelList::new());
                dao.render("find", &[&arg]).unwrap()
            })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!("WHERE id = {} AND tags IN ()", id)
        );
    }
}
