//! Shared blog fixture for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use refguard_core::{
    AccessorTable, EngineConfig, Entity, EntityId, EntityRef, FieldDef, IntegrityAction,
    IntegrityEngine, RelationDescriptor, SchemaCatalog, TypeDef, Value,
};
use refguard_store::ObjectStore;

/// Surface engine logs with `RUST_LOG=refguard_core=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn single(type_name: &str, id: Option<u64>) -> Value {
    id.map(|id| EntityRef::new(type_name, id)).into()
}

fn many(type_name: &str, ids: &[u64]) -> Value {
    Value::collection(ids.iter().map(|&id| EntityRef::new(type_name, id)))
}

fn single_id(value: Value) -> Result<Option<u64>, &'static str> {
    Ok(value.into_single()?.map(|r| r.id.0))
}

fn ids(value: Value) -> Result<Vec<u64>, &'static str> {
    Ok(value.into_collection()?.iter().map(|r| r.id.0).collect())
}

#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub profile: Option<u64>,
    pub articles: Vec<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub id: u64,
    pub user: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub author: Option<u64>,
    pub comments: Vec<u64>,
    pub tags: Vec<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub article: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Tag {
    pub id: u64,
    pub label: String,
    pub articles: Vec<u64>,
}

impl Entity for User {
    const TYPE_NAME: &'static str = "User";

    fn id(&self) -> EntityId {
        EntityId(self.id)
    }

    fn accessors() -> AccessorTable<Self> {
        Self::accessor_table()
            .field(
                "profile",
                |u| single("Profile", u.profile),
                |u, v| {
                    u.profile = single_id(v)?;
                    Ok(())
                },
            )
            .field(
                "articles",
                |u| many("Article", &u.articles),
                |u, v| {
                    u.articles = ids(v)?;
                    Ok(())
                },
            )
    }
}

impl Entity for Profile {
    const TYPE_NAME: &'static str = "Profile";

    fn id(&self) -> EntityId {
        EntityId(self.id)
    }

    fn accessors() -> AccessorTable<Self> {
        Self::accessor_table().field(
            "user",
            |p| single("User", p.user),
            |p, v| {
                p.user = single_id(v)?;
                Ok(())
            },
        )
    }
}

impl Entity for Article {
    const TYPE_NAME: &'static str = "Article";

    fn id(&self) -> EntityId {
        EntityId(self.id)
    }

    fn accessors() -> AccessorTable<Self> {
        Self::accessor_table()
            .field(
                "author",
                |a| single("User", a.author),
                |a, v| {
                    a.author = single_id(v)?;
                    Ok(())
                },
            )
            .field(
                "comments",
                |a| many("Comment", &a.comments),
                |a, v| {
                    a.comments = ids(v)?;
                    Ok(())
                },
            )
            .field(
                "tags",
                |a| many("Tag", &a.tags),
                |a, v| {
                    a.tags = ids(v)?;
                    Ok(())
                },
            )
    }
}

impl Entity for Comment {
    const TYPE_NAME: &'static str = "Comment";

    fn id(&self) -> EntityId {
        EntityId(self.id)
    }

    fn accessors() -> AccessorTable<Self> {
        Self::accessor_table().field(
            "article",
            |c| single("Article", c.article),
            |c, v| {
                c.article = single_id(v)?;
                Ok(())
            },
        )
    }
}

impl Entity for Tag {
    const TYPE_NAME: &'static str = "Tag";

    fn id(&self) -> EntityId {
        EntityId(self.id)
    }

    fn accessors() -> AccessorTable<Self> {
        Self::accessor_table().field(
            "articles",
            |t| many("Article", &t.articles),
            |t, v| {
                t.articles = ids(v)?;
                Ok(())
            },
        )
    }
}

/// Blog schema.
///
/// - `User.profile` NULLIFY `Profile.user`, declared before
///   `User.articles` RESTRICT.
/// - `Article.author` PULL from `User.articles`.
/// - `Article.comments` NULLIFY `Comment.article`.
/// - `Article.tags` PULL from `Tag.articles`.
pub fn blog_catalog() -> SchemaCatalog {
    SchemaCatalog::new()
        .with_type(TypeDef::new("User").with_fields([
            FieldDef::scalar("name"),
            FieldDef::reference("profile", RelationDescriptor::single("Profile").mapped_by("user"))
                .with_integrity(IntegrityAction::Nullify),
            FieldDef::reference(
                "articles",
                RelationDescriptor::collection("Article").mapped_by("author"),
            )
            .with_integrity(IntegrityAction::Restrict),
        ]))
        .with_type(TypeDef::new("Profile").with_field(FieldDef::reference(
            "user",
            RelationDescriptor::single("User"),
        )))
        .with_type(TypeDef::new("Article").with_fields([
            FieldDef::scalar("title"),
            FieldDef::reference("author", RelationDescriptor::single("User").mapped_by("articles"))
                .with_integrity(IntegrityAction::Pull),
            FieldDef::reference(
                "comments",
                RelationDescriptor::collection("Comment").mapped_by("article"),
            )
            .with_integrity(IntegrityAction::Nullify),
            FieldDef::reference(
                "tags",
                RelationDescriptor::collection("Tag").mapped_by("articles"),
            )
            .with_integrity(IntegrityAction::Pull),
        ]))
        .with_type(TypeDef::new("Comment").with_fields([
            FieldDef::scalar("body"),
            FieldDef::reference("article", RelationDescriptor::single("Article")),
        ]))
        .with_type(TypeDef::new("Tag").with_fields([
            FieldDef::scalar("label"),
            FieldDef::reference("articles", RelationDescriptor::collection("Article")),
        ]))
}

/// Store with every blog type registered.
pub fn blog_store(config: EngineConfig) -> ObjectStore {
    init_tracing();
    let engine = IntegrityEngine::load(&blog_catalog(), config).expect("blog catalog is valid");

    let store = ObjectStore::new(Arc::new(engine));
    store.register::<User>().unwrap();
    store.register::<Profile>().unwrap();
    store.register::<Article>().unwrap();
    store.register::<Comment>().unwrap();
    store.register::<Tag>().unwrap();
    store
}

/// Alice (user 1) wrote article 10 with comments 100-102 and tags 1000-1001.
/// Tag 1000 is also on article 11, written by Bob (user 2).
pub fn seed(store: &ObjectStore) {
    store
        .insert(User {
            id: 1,
            name: "alice".into(),
            profile: Some(1),
            articles: vec![10],
        })
        .unwrap();
    store
        .insert(User {
            id: 2,
            name: "bob".into(),
            profile: None,
            articles: vec![11],
        })
        .unwrap();
    store.insert(Profile { id: 1, user: Some(1) }).unwrap();

    store
        .insert(Article {
            id: 10,
            title: "Foreign keys without a database".into(),
            author: Some(1),
            comments: vec![100, 101, 102],
            tags: vec![1000, 1001],
        })
        .unwrap();
    store
        .insert(Article {
            id: 11,
            title: "Second post".into(),
            author: Some(2),
            comments: vec![],
            tags: vec![1000],
        })
        .unwrap();

    for id in 100..=102 {
        store
            .insert(Comment {
                id,
                body: format!("comment {id}"),
                article: Some(10),
            })
            .unwrap();
    }

    store
        .insert(Tag {
            id: 1000,
            label: "rust".into(),
            articles: vec![10, 11],
        })
        .unwrap();
    store
        .insert(Tag {
            id: 1001,
            label: "storage".into(),
            articles: vec![10],
        })
        .unwrap();
}

pub fn handle(type_name: &str, id: u64) -> EntityRef {
    EntityRef::new(type_name, id)
}
