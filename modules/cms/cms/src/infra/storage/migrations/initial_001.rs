use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
}

fn value_table<T: IntoIden + Copy + 'static>(
    table: T,
    id: T,
    value: ColumnDef,
) -> TableCreateStatement {
    let mut stmt = Table::create();
    stmt.table(table)
        .if_not_exists()
        .col(ColumnDef::new(id).uuid().not_null().primary_key())
        .col(value);
    timestamps(&mut stmt).to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut content_types = Table::create();
        content_types
            .table(ContentTypes::Table)
            .if_not_exists()
            .col(ColumnDef::new(ContentTypes::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(ContentTypes::SiteId).big_integer().not_null())
            .col(ColumnDef::new(ContentTypes::Name).string().not_null())
            .col(ColumnDef::new(ContentTypes::Slug).string().not_null())
            .col(ColumnDef::new(ContentTypes::Description).text())
            .col(
                ColumnDef::new(ContentTypes::IsSingle)
                    .boolean()
                    .not_null()
                    .default(false),
            );
        manager
            .create_table(timestamps(&mut content_types).to_owned())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_content_types_site_slug")
                    .table(ContentTypes::Table)
                    .col(ContentTypes::SiteId)
                    .col(ContentTypes::Slug)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let mut components = Table::create();
        components
            .table(Components::Table)
            .if_not_exists()
            .col(ColumnDef::new(Components::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Components::SiteId).big_integer().not_null())
            .col(ColumnDef::new(Components::Name).string().not_null())
            .col(ColumnDef::new(Components::Slug).string().not_null())
            .col(ColumnDef::new(Components::Description).text())
            .col(
                ColumnDef::new(Components::Repeatable)
                    .boolean()
                    .not_null()
                    .default(false),
            );
        manager
            .create_table(timestamps(&mut components).to_owned())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_components_site_slug")
                    .table(Components::Table)
                    .col(Components::SiteId)
                    .col(Components::Slug)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let mut fields = Table::create();
        fields
            .table(Fields::Table)
            .if_not_exists()
            .col(ColumnDef::new(Fields::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Fields::ContentTypeId).uuid())
            .col(ColumnDef::new(Fields::ComponentId).uuid())
            .col(ColumnDef::new(Fields::Name).string().not_null())
            .col(ColumnDef::new(Fields::FieldType).string().not_null())
            .col(ColumnDef::new(Fields::Description).text())
            .col(
                ColumnDef::new(Fields::Required)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Fields::Options).text().not_null())
            .col(ColumnDef::new(Fields::Position).integer().not_null())
            .col(
                ColumnDef::new(Fields::Width)
                    .string_len(8)
                    .not_null()
                    .default("full"),
            )
            .col(ColumnDef::new(Fields::RowGroup).integer())
            .col(ColumnDef::new(Fields::ComponentRef).uuid())
            .check(Expr::cust(
                "(content_type_id IS NOT NULL AND component_id IS NULL) \
                 OR (content_type_id IS NULL AND component_id IS NOT NULL)",
            ))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_fields_content_type")
                    .from(Fields::Table, Fields::ContentTypeId)
                    .to(ContentTypes::Table, ContentTypes::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_fields_component")
                    .from(Fields::Table, Fields::ComponentId)
                    .to(Components::Table, Components::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager
            .create_table(timestamps(&mut fields).to_owned())
            .await?;
        for (name, owner) in [
            ("idx_fields_content_type_name", Fields::ContentTypeId),
            ("idx_fields_component_name", Fields::ComponentId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Fields::Table)
                        .col(owner)
                        .col(Fields::Name)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        let mut contents = Table::create();
        contents
            .table(Contents::Table)
            .if_not_exists()
            .col(ColumnDef::new(Contents::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Contents::SiteId).big_integer().not_null())
            .col(ColumnDef::new(Contents::ContentTypeId).uuid().not_null())
            .col(ColumnDef::new(Contents::Slug).string().not_null())
            .col(
                ColumnDef::new(Contents::Status)
                    .string_len(16)
                    .not_null()
                    .default("draft"),
            )
            .col(ColumnDef::new(Contents::PublishedAt).timestamp_with_time_zone())
            .col(ColumnDef::new(Contents::UnpublishedAt).timestamp_with_time_zone())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_contents_content_type")
                    .from(Contents::Table, Contents::ContentTypeId)
                    .to(ContentTypes::Table, ContentTypes::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager
            .create_table(timestamps(&mut contents).to_owned())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_contents_slug")
                    .table(Contents::Table)
                    .col(Contents::Slug)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let mut content_values = Table::create();
        content_values
            .table(ContentValues::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(ContentValues::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ContentValues::ContentId).uuid().not_null())
            .col(ColumnDef::new(ContentValues::FieldId).uuid().not_null())
            .col(
                ColumnDef::new(ContentValues::ValueKind)
                    .string_len(16)
                    .not_null(),
            )
            .col(ColumnDef::new(ContentValues::ValueId).uuid().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_content_values_content")
                    .from(ContentValues::Table, ContentValues::ContentId)
                    .to(Contents::Table, Contents::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_content_values_field")
                    .from(ContentValues::Table, ContentValues::FieldId)
                    .to(Fields::Table, Fields::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager
            .create_table(timestamps(&mut content_values).to_owned())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_content_values_content_field")
                    .table(ContentValues::Table)
                    .col(ContentValues::ContentId)
                    .col(ContentValues::FieldId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(value_table(
                ValueStrings::Table,
                ValueStrings::Id,
                ColumnDef::new(ValueStrings::Value).string().not_null().to_owned(),
            ))
            .await?;
        manager
            .create_table(value_table(
                ValueTexts::Table,
                ValueTexts::Id,
                ColumnDef::new(ValueTexts::Value).text().not_null().to_owned(),
            ))
            .await?;
        manager
            .create_table(value_table(
                ValueBooleans::Table,
                ValueBooleans::Id,
                ColumnDef::new(ValueBooleans::Value).boolean().not_null().to_owned(),
            ))
            .await?;
        manager
            .create_table(value_table(
                ValueIntegers::Table,
                ValueIntegers::Id,
                ColumnDef::new(ValueIntegers::Value)
                    .big_integer()
                    .not_null()
                    .to_owned(),
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "field_values_integers",
            "field_values_booleans",
            "field_values_texts",
            "field_values_strings",
            "content_values",
            "contents",
            "fields",
            "components",
            "content_types",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ContentTypes {
    Table,
    Id,
    SiteId,
    Name,
    Slug,
    Description,
    IsSingle,
}

#[derive(DeriveIden)]
enum Components {
    Table,
    Id,
    SiteId,
    Name,
    Slug,
    Description,
    Repeatable,
}

#[derive(DeriveIden, Clone, Copy)]
enum Fields {
    Table,
    Id,
    ContentTypeId,
    ComponentId,
    Name,
    FieldType,
    Description,
    Required,
    Options,
    Position,
    Width,
    RowGroup,
    ComponentRef,
}

#[derive(DeriveIden)]
enum Contents {
    Table,
    Id,
    SiteId,
    ContentTypeId,
    Slug,
    Status,
    PublishedAt,
    UnpublishedAt,
}

#[derive(DeriveIden)]
enum ContentValues {
    Table,
    Id,
    ContentId,
    FieldId,
    ValueKind,
    ValueId,
}

#[derive(DeriveIden, Clone, Copy)]
enum ValueStrings {
    #[sea_orm(iden = "field_values_strings")]
    Table,
    Id,
    Value,
}

#[derive(DeriveIden, Clone, Copy)]
enum ValueTexts {
    #[sea_orm(iden = "field_values_texts")]
    Table,
    Id,
    Value,
}

#[derive(DeriveIden, Clone, Copy)]
enum ValueBooleans {
    #[sea_orm(iden = "field_values_booleans")]
    Table,
    Id,
    Value,
}

#[derive(DeriveIden, Clone, Copy)]
enum ValueIntegers {
    #[sea_orm(iden = "field_values_integers")]
    Table,
    Id,
    Value,
}
