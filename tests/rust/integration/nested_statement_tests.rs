//! A compiled statement reused as the source of another statement

use arrayql::request::ast::Expression;
use arrayql::statement::{JoinCondition, Select, SequentialTags, Source};
use arrayql::translator::Translator;

use super::people_schema;

#[test]
fn test_compiled_statement_as_join_source() -> anyhow::Result<()> {
    let schema = people_schema();
    let tags = SequentialTags::new();
    let request = Expression::function("count", vec![Expression::property("People.Pets")]);
    let inner = Translator::new(&schema, &tags).translate(&request)?;

    let mut outer = Select::new(&tags);
    let people = outer.set_from("People")?;
    let counts = outer.add_join(
        people,
        Source::Subquery(inner),
        JoinCondition::equals("`Id`", "`0`"),
        true,
        false,
    )?;
    outer.add_column_for_table(counts, "`0`")?;

    let expected = "SELECT\n\
        \t`3`.`0` AS `0`\n\
        FROM `People` AS `2`\n\
        LEFT JOIN (\n\
        \t\tSELECT\n\
        \t\t\tCOUNT(`1`.`Id`) AS `0`\n\
        \t\tFROM `People` AS `0`\n\
        \t\tLEFT JOIN `Pets` AS `1` ON `0`.`Id` = `1`.`OwnerId`\n\
        ) AS `3` ON `2`.`Id` = `3`.`0`";
    assert_eq!(outer.render()?, expected);
    Ok(())
}
