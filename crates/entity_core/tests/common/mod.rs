//! Sample school domain shared by the integration tests.
#![allow(dead_code)]

use entity_core::db::open_db_in_memory;
use entity_core::model::{
    key_from_row, Entity, EntityTraits, IncludeSet, NoIncludes, NoSort, OrderTerm,
    SearchCriteria, SearchObject, SortKey,
};
use entity_core::normalize::{
    join_normalized, normalize_text, Capability, DefaultEntityNormalizer, EntityNormalizer,
    HasCapability, Normalizable, NormalizeContext, NormalizeError, NormalizeResult,
    NormalizerRegistry,
};
use entity_core::query::{
    FilterGroup, FilterTarget, FilteredQueryBuilder, GlobalQueryFilter, Predicate, QueryBuilder,
    QueryFilterRegistry,
};
use entity_core::repo::{EntityProcessor, RepoResult};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub const SCHEMA: &str = "
CREATE TABLE departments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    start_year INTEGER NOT NULL,
    normalized_title TEXT,
    normalized_content TEXT
);
CREATE TABLE persons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    given_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    description TEXT,
    email TEXT,
    phone TEXT,
    department_id INTEGER REFERENCES departments(id),
    normalized_title TEXT,
    normalized_content TEXT
);
CREATE TABLE courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    department_id INTEGER NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
    instructor_id INTEGER REFERENCES persons(id),
    title TEXT NOT NULL
);
CREATE TABLE tags (
    id TEXT PRIMARY KEY,
    label TEXT NOT NULL
);
";

const SEED: &str = "
INSERT INTO departments (id, title, start_year) VALUES
    (1, 'English', 2007),
    (2, 'Mathematics', 2007),
    (3, 'Engineering', 2010),
    (4, 'Economics', 2012);
INSERT INTO persons (id, kind, given_name, last_name, email, department_id) VALUES
    (1, 'student', 'Carson', 'Alexander', 'carson@school.test', NULL),
    (2, 'student', 'Meredith', 'Alonso', NULL, NULL),
    (3, 'instructor', 'Kim', 'Abercrombie', 'kim@school.test', 1),
    (4, 'instructor', 'Fadi', 'Fakhouri', NULL, 2),
    (5, 'person', 'François', 'Du sacré-Cœur', NULL, NULL);
INSERT INTO courses (id, department_id, instructor_id, title) VALUES
    (1, 1, 3, 'Composition'),
    (2, 1, 3, 'Literature'),
    (3, 2, 4, 'Calculus'),
    (4, 2, 4, 'Trigonometry'),
    (5, 3, NULL, 'Chemistry');
";

/// In-memory database with the school schema and no rows.
pub fn setup_empty() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn
}

/// In-memory database with the school schema and seed rows.
pub fn setup() -> Connection {
    let conn = setup_empty();
    conn.execute_batch(SEED).unwrap();
    conn
}

pub fn ids<E: Entity<Key = i64>>(items: &[E]) -> Vec<i64> {
    items.iter().map(Entity::id).collect()
}

// ---------------------------------------------------------------------------
// Capabilities

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchoolCapability {
    Entity,
    Person,
    Student,
    Instructor,
    HasCourses,
    Department,
}

impl Capability for SchoolCapability {
    fn implied(self) -> &'static [Self] {
        match self {
            Self::Entity | Self::HasCourses => &[],
            Self::Person => &[Self::Entity],
            Self::Student => &[Self::Person],
            Self::Instructor => &[Self::Person, Self::HasCourses],
            Self::Department => &[Self::Entity, Self::HasCourses],
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Entity,
            Self::Person,
            Self::Student,
            Self::Instructor,
            Self::HasCourses,
            Self::Department,
        ]
    }
}

/// Widest entity view the school normalizers work with.
pub trait SchoolEntity: HasCapability<SchoolCapability> + Normalizable {
    fn entity_id(&self) -> i64;

    fn display_title(&self) -> &str;
}

pub type SchoolRegistry = NormalizerRegistry<SchoolCapability, dyn SchoolEntity>;

pub fn person_view(person: &mut Person) -> &mut (dyn SchoolEntity + 'static) {
    person
}

pub fn department_view(department: &mut Department) -> &mut (dyn SchoolEntity + 'static) {
    department
}

// ---------------------------------------------------------------------------
// Courses

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub department_id: i64,
    pub instructor_id: Option<i64>,
    pub title: String,
}

impl Entity for Course {
    type Key = i64;

    const TABLE: &'static str = "courses";
    const COLUMNS: &'static [&'static str] = &["department_id", "instructor_id", "title"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.department_id),
            self.instructor_id.map_or(Value::Null, Value::Integer),
            Value::Text(self.title.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: key_from_row(row, "id")?,
            department_id: row.get("department_id")?,
            instructor_id: row.get("instructor_id")?,
            title: row.get("title")?,
        })
    }
}

pub struct CourseTraits;

impl EntityTraits for CourseTraits {
    type Entity = Course;
    type SearchObject = SearchCriteria<i64>;
    type SortBy = NoSort;
    type Includes = NoIncludes;
}

fn courses_where(conn: &Connection, column: &str, id: i64) -> rusqlite::Result<Vec<Course>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, department_id, instructor_id, title FROM courses WHERE {column} = ?1 ORDER BY title"
    ))?;
    let courses = stmt
        .query_map([id], |row| Course::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(courses)
}

// ---------------------------------------------------------------------------
// Persons

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    #[default]
    Person,
    Student,
    Instructor,
}

impl PersonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Student => "student",
            Self::Instructor => "instructor",
        }
    }
}

impl FromSql for PersonKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "person" => Ok(Self::Person),
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: i64,
    pub kind: PersonKind,
    pub given_name: String,
    pub last_name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i64>,
    pub normalized_title: Option<String>,
    pub normalized_content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub courses: Vec<Course>,
}

impl Person {
    pub fn new(kind: PersonKind, given_name: &str, last_name: &str) -> Self {
        Self {
            kind,
            given_name: given_name.to_string(),
            last_name: last_name.to_string(),
            ..Self::default()
        }
    }
}

impl Entity for Person {
    type Key = i64;

    const TABLE: &'static str = "persons";
    const COLUMNS: &'static [&'static str] = &[
        "kind",
        "given_name",
        "last_name",
        "description",
        "email",
        "phone",
        "department_id",
        "normalized_title",
        "normalized_content",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.kind.as_str().to_string()),
            Value::Text(self.given_name.clone()),
            Value::Text(self.last_name.clone()),
            optional_text(&self.description),
            optional_text(&self.email),
            optional_text(&self.phone),
            self.department_id.map_or(Value::Null, Value::Integer),
            optional_text(&self.normalized_title),
            optional_text(&self.normalized_content),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: key_from_row(row, "id")?,
            kind: row.get("kind")?,
            given_name: row.get("given_name")?,
            last_name: row.get("last_name")?,
            description: row.get("description")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            department_id: row.get("department_id")?,
            normalized_title: row.get("normalized_title")?,
            normalized_content: row.get("normalized_content")?,
            courses: Vec::new(),
        })
    }
}

impl HasCapability<SchoolCapability> for Person {
    fn capability(&self) -> SchoolCapability {
        match self.kind {
            PersonKind::Person => SchoolCapability::Person,
            PersonKind::Student => SchoolCapability::Student,
            PersonKind::Instructor => SchoolCapability::Instructor,
        }
    }
}

impl Normalizable for Person {
    fn title_sources(&self) -> Vec<Option<&str>> {
        vec![Some(self.last_name.as_str()), Some(self.given_name.as_str())]
    }

    fn content_sources(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.given_name.as_str()),
            Some(self.last_name.as_str()),
            self.description.as_deref(),
            self.email.as_deref(),
            self.phone.as_deref(),
        ]
    }

    fn normalized_title(&self) -> Option<&str> {
        self.normalized_title.as_deref()
    }

    fn normalized_content(&self) -> Option<&str> {
        self.normalized_content.as_deref()
    }

    fn set_normalized_title(&mut self, value: Option<String>) {
        self.normalized_title = value;
    }

    fn set_normalized_content(&mut self, value: Option<String>) {
        self.normalized_content = value;
    }
}

impl SchoolEntity for Person {
    fn entity_id(&self) -> i64 {
        self.id
    }

    fn display_title(&self) -> &str {
        &self.last_name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonSearch {
    #[serde(flatten)]
    pub criteria: SearchCriteria<i64>,
    pub q: Option<String>,
    pub kind: Option<PersonKind>,
    pub department_id: Option<i64>,
}

impl SearchObject for PersonSearch {
    type Key = i64;

    fn id(&self) -> Option<i64> {
        self.criteria.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.criteria.id = id;
    }

    fn ids(&self) -> &[i64] {
        &self.criteria.ids
    }

    fn exclude(&self) -> &[i64] {
        &self.criteria.exclude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonSort {
    LastName,
    GivenNameDesc,
}

impl SortKey for PersonSort {
    fn order_terms(self) -> &'static [OrderTerm] {
        const LAST_NAME: &[OrderTerm] =
            &[OrderTerm::asc("last_name"), OrderTerm::asc("given_name")];
        const GIVEN_NAME_DESC: &[OrderTerm] = &[OrderTerm::desc("given_name")];
        match self {
            Self::LastName => LAST_NAME,
            Self::GivenNameDesc => GIVEN_NAME_DESC,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonIncludes {
    pub courses: bool,
}

impl IncludeSet for PersonIncludes {
    fn is_empty(&self) -> bool {
        !self.courses
    }
}

pub struct PersonTraits;

impl EntityTraits for PersonTraits {
    type Entity = Person;
    type SearchObject = PersonSearch;
    type SortBy = PersonSort;
    type Includes = PersonIncludes;

    fn attach_includes(
        conn: &Connection,
        items: &mut [Person],
        includes: PersonIncludes,
    ) -> rusqlite::Result<()> {
        if includes.courses {
            for person in items.iter_mut() {
                person.courses = courses_where(conn, "instructor_id", person.id)?;
            }
        }
        Ok(())
    }
}

/// Free text, kind and department filters for persons.
pub struct PersonQueryFilter;

impl FilteredQueryBuilder<PersonTraits> for PersonQueryFilter {
    fn build(&self, so: &PersonSearch, group: &mut FilterGroup) {
        if let Some(q) = so.q.as_deref() {
            let needle = normalize_text(q);
            if !needle.is_empty() {
                group.and(Predicate::contains("normalized_content", needle));
            }
        }
        if let Some(kind) = so.kind {
            group.and(Predicate::eq("kind", kind.as_str().to_string()));
        }
        if let Some(department_id) = so.department_id {
            group.and(Predicate::eq("department_id", department_id));
        }
    }
}

pub fn person_query_builder() -> QueryBuilder<PersonTraits> {
    QueryBuilder::new().with_filter(PersonQueryFilter)
}

// ---------------------------------------------------------------------------
// Departments

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Department {
    pub id: i64,
    pub title: String,
    pub start_year: i64,
    pub normalized_title: Option<String>,
    pub normalized_content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub courses: Vec<Course>,
    /// Filled after reads by [`CourseCountProcessor`]; never stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_count: Option<i64>,
}

impl Department {
    pub fn new(title: &str, start_year: i64) -> Self {
        Self {
            title: title.to_string(),
            start_year,
            ..Self::default()
        }
    }
}

impl Entity for Department {
    type Key = i64;

    const TABLE: &'static str = "departments";
    const COLUMNS: &'static [&'static str] =
        &["title", "start_year", "normalized_title", "normalized_content"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Integer(self.start_year),
            optional_text(&self.normalized_title),
            optional_text(&self.normalized_content),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: key_from_row(row, "id")?,
            title: row.get("title")?,
            start_year: row.get("start_year")?,
            normalized_title: row.get("normalized_title")?,
            normalized_content: row.get("normalized_content")?,
            courses: Vec::new(),
            course_count: None,
        })
    }
}

impl HasCapability<SchoolCapability> for Department {
    fn capability(&self) -> SchoolCapability {
        SchoolCapability::Department
    }
}

impl Normalizable for Department {
    fn title_sources(&self) -> Vec<Option<&str>> {
        vec![Some(self.title.as_str())]
    }

    fn content_sources(&self) -> Vec<Option<&str>> {
        vec![Some(self.title.as_str())]
    }

    fn normalized_title(&self) -> Option<&str> {
        self.normalized_title.as_deref()
    }

    fn normalized_content(&self) -> Option<&str> {
        self.normalized_content.as_deref()
    }

    fn set_normalized_title(&mut self, value: Option<String>) {
        self.normalized_title = value;
    }

    fn set_normalized_content(&mut self, value: Option<String>) {
        self.normalized_content = value;
    }
}

impl SchoolEntity for Department {
    fn entity_id(&self) -> i64 {
        self.id
    }

    fn display_title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentSearch {
    #[serde(flatten)]
    pub criteria: SearchCriteria<i64>,
    pub min_start_year: Option<i64>,
    pub has_courses: Option<bool>,
}

impl SearchObject for DepartmentSearch {
    type Key = i64;

    fn id(&self) -> Option<i64> {
        self.criteria.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.criteria.id = id;
    }

    fn ids(&self) -> &[i64] {
        &self.criteria.ids
    }

    fn exclude(&self) -> &[i64] {
        &self.criteria.exclude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentSort {
    Title,
    StartYearDesc,
}

impl SortKey for DepartmentSort {
    fn order_terms(self) -> &'static [OrderTerm] {
        const TITLE: &[OrderTerm] = &[OrderTerm::asc("title")];
        const START_YEAR_DESC: &[OrderTerm] = &[OrderTerm::desc("start_year")];
        match self {
            Self::Title => TITLE,
            Self::StartYearDesc => START_YEAR_DESC,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepartmentIncludes {
    pub courses: bool,
}

impl IncludeSet for DepartmentIncludes {
    fn is_empty(&self) -> bool {
        !self.courses
    }
}

pub struct DepartmentTraits;

impl EntityTraits for DepartmentTraits {
    type Entity = Department;
    type SearchObject = DepartmentSearch;
    type SortBy = DepartmentSort;
    type Includes = DepartmentIncludes;

    fn attach_includes(
        conn: &Connection,
        items: &mut [Department],
        includes: DepartmentIncludes,
    ) -> rusqlite::Result<()> {
        if includes.courses {
            for department in items.iter_mut() {
                department.courses = courses_where(conn, "department_id", department.id)?;
            }
        }
        Ok(())
    }
}

/// Start year and course existence filters for departments.
pub struct DepartmentQueryFilter;

impl FilteredQueryBuilder<DepartmentTraits> for DepartmentQueryFilter {
    fn build(&self, so: &DepartmentSearch, group: &mut FilterGroup) {
        if let Some(year) = so.min_start_year {
            group.and(Predicate::new("start_year >= ?", [Value::Integer(year)]));
        }
        match so.has_courses {
            Some(true) => group.and(Predicate::new(
                "EXISTS (SELECT 1 FROM courses WHERE courses.department_id = departments.id)",
                [],
            )),
            Some(false) => group.and(Predicate::new(
                "NOT EXISTS (SELECT 1 FROM courses WHERE courses.department_id = departments.id)",
                [],
            )),
            None => {}
        }
    }
}

pub fn department_query_builder() -> QueryBuilder<DepartmentTraits> {
    QueryBuilder::new().with_filter(DepartmentQueryFilter)
}

/// Counts the courses of every department of one read in a single query.
pub struct CourseCountProcessor;

impl EntityProcessor<Department> for CourseCountProcessor {
    fn process_many(&self, conn: &Connection, items: &mut [Department]) -> RepoResult<()> {
        let mut stmt =
            conn.prepare("SELECT department_id, COUNT(*) FROM courses GROUP BY department_id")?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        for department in items.iter_mut() {
            department.course_count = Some(counts.get(&department.id).copied().unwrap_or(0));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Global filters

/// Keeps only rows some course points at, for every `HasCourses` entity.
pub struct HasCoursesFilter;

impl GlobalQueryFilter for HasCoursesFilter {
    fn build(&self, target: &FilterTarget, group: &mut FilterGroup) {
        let column = match target.table {
            "departments" => "department_id",
            _ => "instructor_id",
        };
        group.and(Predicate::new(
            format!(
                "EXISTS (SELECT 1 FROM courses WHERE courses.{column} = {}.{})",
                target.table, target.key_column
            ),
            [],
        ));
    }
}

/// Hides the row with one key, for every entity.
pub struct HideKey(pub i64);

impl GlobalQueryFilter for HideKey {
    fn build(&self, target: &FilterTarget, group: &mut FilterGroup) {
        group.and(Predicate::new(
            format!("{} <> ?", target.key_column),
            [Value::Integer(self.0)],
        ));
    }
}

pub fn school_filters() -> QueryFilterRegistry<SchoolCapability> {
    QueryFilterRegistry::builder()
        .register(SchoolCapability::HasCourses, HasCoursesFilter)
        .register(SchoolCapability::Entity, HideKey(2))
        .build()
}

// ---------------------------------------------------------------------------
// Tags (client generated keys)

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub label: String,
}

impl Entity for Tag {
    type Key = Uuid;

    const TABLE: &'static str = "tags";
    const COLUMNS: &'static [&'static str] = &["label"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn to_values(&self) -> Vec<Value> {
        vec![Value::Text(self.label.clone())]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: key_from_row(row, "id")?,
            label: row.get("label")?,
        })
    }
}

pub struct TagTraits;

impl EntityTraits for TagTraits {
    type Entity = Tag;
    type SearchObject = SearchCriteria<Uuid>;
    type SortBy = NoSort;
    type Includes = NoIncludes;
}

// ---------------------------------------------------------------------------
// Normalizers

/// Prefixes person content with a marker word.
#[derive(Debug, Clone, Copy)]
pub struct PersonNormalizer;

impl EntityNormalizer<dyn SchoolEntity> for PersonNormalizer {
    fn normalize(
        &self,
        _ctx: &NormalizeContext<'_>,
        item: &mut (dyn SchoolEntity + 'static),
    ) -> NormalizeResult<()> {
        let content = join_normalized([Some("PERSON"), item.normalized_content()]);
        item.set_normalized_content(content);
        Ok(())
    }
}

/// Appends the titles of the courses an instructor teaches.
#[derive(Debug, Clone, Copy)]
pub struct InstructorNormalizer;

impl EntityNormalizer<dyn SchoolEntity> for InstructorNormalizer {
    fn normalize(
        &self,
        ctx: &NormalizeContext<'_>,
        item: &mut (dyn SchoolEntity + 'static),
    ) -> NormalizeResult<()> {
        let titles: Vec<String> = ctx.query_all(
            "SELECT title FROM courses WHERE instructor_id = ?1 ORDER BY title",
            [item.entity_id()],
            |row| row.get(0),
        )?;
        let mut parts = vec![item.normalized_content(), Some("INSTRUCTOR")];
        parts.extend(titles.iter().map(|title| Some(title.as_str())));
        let content = join_normalized(parts);
        item.set_normalized_content(content);
        Ok(())
    }
}

/// Builds department fields from the title and course titles only.
#[derive(Debug, Clone, Copy)]
pub struct DepartmentNormalizer;

impl EntityNormalizer<dyn SchoolEntity> for DepartmentNormalizer {
    fn normalize(
        &self,
        ctx: &NormalizeContext<'_>,
        item: &mut (dyn SchoolEntity + 'static),
    ) -> NormalizeResult<()> {
        if item.display_title().trim().is_empty() {
            return Err(NormalizeError::InvalidEntity(format!(
                "department {} has no title",
                item.entity_id()
            )));
        }
        let titles: Vec<String> = ctx.query_all(
            "SELECT title FROM courses WHERE department_id = ?1 ORDER BY title",
            [item.entity_id()],
            |row| row.get(0),
        )?;
        let title = join_normalized([Some(item.display_title())]);
        let mut parts = vec![Some(item.display_title())];
        parts.extend(titles.iter().map(|title| Some(title.as_str())));
        let content = join_normalized(parts);
        item.set_normalized_title(title);
        item.set_normalized_content(content);
        Ok(())
    }

    fn is_exclusive(&self) -> bool {
        true
    }
}

/// Default normalizer for every entity plus the person, instructor and
/// exclusive department normalizers.
pub fn school_registry() -> Arc<SchoolRegistry> {
    Arc::new(
        SchoolRegistry::builder()
            .register_instance(SchoolCapability::Entity, DefaultEntityNormalizer)
            .register_instance(SchoolCapability::Person, PersonNormalizer)
            .register(SchoolCapability::Instructor, |_| Box::new(InstructorNormalizer))
            .register_instance(SchoolCapability::Department, DepartmentNormalizer)
            .build(),
    )
}

fn optional_text(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::Text)
}
