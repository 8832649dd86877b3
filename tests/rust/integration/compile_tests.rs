//! End-to-end compilation scenarios

use std::thread;

use arrayql::request::ast::Expression;
use arrayql::statement::{SequentialTags, SharedTags};
use arrayql::translator::{CompileError, Translator, TranslatorError};

use super::people_schema;

fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::function(name, arguments)
}

fn translate(request: &Expression) -> Result<String, CompileError> {
    let schema = people_schema();
    let tags = SequentialTags::new();
    Translator::new(&schema, &tags).translate(request)
}

#[test]
fn test_count_pets_older_than() {
    let request = call(
        "count",
        vec![call(
            "filter",
            vec![
                Expression::property("People.Pets"),
                call(
                    "greater",
                    vec![Expression::property("Pets.age"), Expression::parameter("minAge")],
                ),
            ],
        )],
    );
    assert_eq!(
        request.to_string(),
        "count(filter(People.Pets, greater(Pets.age, :minAge)))"
    );

    let sql = translate(&request).unwrap();
    assert_eq!(
        sql,
        "SELECT\n\
        \tCOUNT(`1`.`Id`) AS `0`\n\
        FROM `People` AS `0`\n\
        LEFT JOIN `Pets` AS `1` ON `0`.`Id` = `1`.`OwnerId`\n\
        WHERE `1`.`Age` > :minAge"
    );
    assert_eq!(sql.matches("LEFT JOIN").count(), 1);
    assert_eq!(sql.matches("COUNT(").count(), 1);
}

#[test]
fn test_sorted_slice_orders_before_limit() {
    let request = call(
        "count",
        vec![call(
            "slice",
            vec![
                call(
                    "sort",
                    vec![
                        Expression::property("People"),
                        Expression::property("People.lastName"),
                    ],
                ),
                Expression::literal(0),
                Expression::literal(10),
            ],
        )],
    );

    let sql = translate(&request).unwrap();
    let order_at = sql.find("ORDER BY `0`.`Last` ASC").unwrap();
    let limit_at = sql.find("LIMIT 0, 10").unwrap();
    assert!(order_at < limit_at);
}

#[test]
fn test_to_one_hop_from_pets() {
    let request = call(
        "count",
        vec![call(
            "filter",
            vec![
                Expression::property("Pets"),
                call(
                    "equal",
                    vec![
                        Expression::property("Pets.Owner.lastName"),
                        Expression::parameter("last"),
                    ],
                ),
            ],
        )],
    );
    assert_eq!(
        translate(&request).unwrap(),
        "SELECT\n\
        \tCOUNT(`0`.`Id`) AS `0`\n\
        FROM `Pets` AS `0`\n\
        INNER JOIN `People` AS `1` ON `0`.`OwnerId` = `1`.`Id`\n\
        WHERE `1`.`Last` = :last"
    );
}

#[test]
fn test_average_age_of_filtered_sorted_page() {
    let adults = call(
        "filter",
        vec![
            Expression::property("People"),
            call(
                "and",
                vec![
                    call(
                        "greaterEqual",
                        vec![Expression::property("People.age"), Expression::literal(18)],
                    ),
                    call(
                        "match",
                        vec![
                            Expression::property("People.Address.city"),
                            Expression::parameter("cityPattern"),
                        ],
                    ),
                ],
            ),
        ],
    );
    let page = call(
        "slice",
        vec![
            call(
                "sort",
                vec![adults, call("not", vec![Expression::property("People.age")])],
            ),
            Expression::parameter("offset"),
            Expression::literal(20),
        ],
    );
    let request = call("count", vec![page]);

    assert_eq!(
        translate(&request).unwrap(),
        "SELECT\n\
        \tCOUNT(`0`.`Id`) AS `0`\n\
        FROM `People` AS `0`\n\
        INNER JOIN `Addresses` AS `1` ON `0`.`AddressId` = `1`.`Id`\n\
        WHERE (`0`.`Age` >= 18) AND (`1`.`City` REGEXP :cityPattern)\n\
        ORDER BY `0`.`Age` DESC\n\
        LIMIT :offset, 20"
    );
}

#[test]
fn test_failures_name_the_request() {
    let request = call("map", vec![Expression::property("People")]);
    let error = translate(&request).unwrap_err();
    assert!(matches!(
        error.cause(),
        TranslatorError::NotImplemented(_)
    ));
    assert!(error.to_string().starts_with("Failed to compile `map(People)`"));
}

#[test]
fn test_concurrent_compilations_never_share_tags() {
    let schema = people_schema();
    let tags = SharedTags::new("t");
    let request = call("count", vec![Expression::property("People.Pets")]);

    let outputs: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    Translator::new(&schema, &tags)
                        .translate(&request)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut from_lines: Vec<&str> = outputs
        .iter()
        .map(|sql| sql.lines().find(|line| line.starts_with("FROM")).unwrap())
        .collect();
    from_lines.sort();
    from_lines.dedup();
    assert_eq!(from_lines.len(), 4);
}
