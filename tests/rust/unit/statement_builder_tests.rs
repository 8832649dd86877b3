//! Builder laws through the public API

use arrayql::statement::{JoinCondition, SequentialTags, SharedTags, Select, TagGenerator};
use test_case::test_case;

fn owner_condition() -> JoinCondition {
    JoinCondition::parse("`0`.`Id` = `1`.`OwnerId`")
}

#[test_case(false, false, "INNER JOIN" ; "required to-one")]
#[test_case(true, false, "LEFT JOIN" ; "optional to-one")]
#[test_case(false, true, "LEFT JOIN" ; "required to-many")]
#[test_case(true, true, "LEFT JOIN" ; "optional to-many")]
fn test_join_kind_law(is_optional: bool, is_many: bool, expected: &str) {
    let tags = SequentialTags::new();
    let mut select = Select::new(&tags);
    let people = select.set_from("People").unwrap();
    let pets = select
        .add_join(people, "Pets", owner_condition(), is_optional, is_many)
        .unwrap();
    select.add_column_for_table(pets, "`Name`").unwrap();

    let sql = select.render().unwrap();
    assert!(
        sql.contains(&format!("{} `Pets` AS `1` ON `0`.`Id` = `1`.`OwnerId`", expected)),
        "{}",
        sql
    );
}

#[test]
fn test_shared_tags_across_statements() {
    let tags = SharedTags::new("t");
    let mut first = Select::new(&tags);
    let mut second = Select::new(&tags);
    first.set_from("People").unwrap();
    second.set_from("People").unwrap();
    first.add_column("1");
    second.add_column("1");

    assert!(first.render().unwrap().ends_with("AS `t0`"));
    assert!(second.render().unwrap().ends_with("AS `t1`"));
    assert_eq!(tags.next_tag().as_str(), "t2");
}
