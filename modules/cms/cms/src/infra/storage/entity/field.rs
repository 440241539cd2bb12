use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

/// Field definition row. Exactly one of `content_type_id` / `component_id`
/// is set (enforced by a CHECK constraint and by the mapper).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub content_type_id: Option<Uuid>,
    pub component_id: Option<Uuid>,
    pub name: String,
    pub field_type: String,
    pub description: Option<String>,
    pub required: bool,
    /// JSON object text.
    #[sea_orm(column_type = "Text")]
    pub options: String,
    pub position: i32,
    pub width: String,
    pub row_group: Option<i32>,
    /// Component embedded by a `component` field, mirrored from `options.component_id`.
    pub component_ref: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content_type::Entity",
        from = "Column::ContentTypeId",
        to = "super::content_type::Column::Id",
        on_delete = "Cascade"
    )]
    ContentType,
    #[sea_orm(
        belongs_to = "super::component::Entity",
        from = "Column::ComponentId",
        to = "super::component::Column::Id",
        on_delete = "Cascade"
    )]
    Component,
}

impl Related<super::content_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentType.def()
    }
}

impl Related<super::component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Component.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
