//! SQLite-backed generic repository.

use crate::model::entity::{Entity, EntityKey};
use crate::model::search::{IncludeSet, PagingInfo, SearchObject};
use crate::model::traits::{EntityTraits, KeyOf};
use crate::query::builder::{select_columns, EntityQuery, FilteredQueryBuilder, QueryBuilder};
use crate::repo::cancel::CancellationToken;
use crate::repo::contract::{EntityReadService, EntityRepositoryApi};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::hooks::{NoHooks, RepositoryHooks};
use crate::repo::interceptor::SaveInterceptor;
use crate::repo::processor::EntityProcessor;
use crate::repo::unit_of_work::{EntryId, EntryState, Operation, UnitOfWork};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, DatabaseName};
use std::sync::Arc;
use std::time::Instant;

/// Generic repository for one entity bundle over a borrowed connection.
///
/// Reads go straight to the connection. Writes are staged in an internal
/// unit of work and reach storage only through
/// [`EntityRepositoryApi::save_changes`].
pub struct EntityRepository<'conn, T: EntityTraits, H = NoHooks> {
    conn: &'conn Connection,
    query_builder: QueryBuilder<T>,
    hooks: H,
    interceptors: Vec<Arc<dyn SaveInterceptor<T::Entity>>>,
    processors: Vec<Arc<dyn EntityProcessor<T::Entity>>>,
    unit_of_work: UnitOfWork<T::Entity>,
    read_only: bool,
}

impl<'conn, T: EntityTraits> EntityRepository<'conn, T> {
    /// Creates a repository after checking the entity table and columns.
    ///
    /// Connections opened read-only produce a repository whose write
    /// operations fail with [`RepoError::NotSupported`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_entity_table::<T::Entity>(conn)?;
        let read_only = conn.is_readonly(DatabaseName::Main)?;
        Ok(Self {
            conn,
            query_builder: QueryBuilder::new(),
            hooks: NoHooks,
            interceptors: Vec::new(),
            processors: Vec::new(),
            unit_of_work: UnitOfWork::new(),
            read_only,
        })
    }
}

impl<'conn, T, H> EntityRepository<'conn, T, H>
where
    T: EntityTraits,
    H: RepositoryHooks<T::Entity>,
{
    pub fn with_hooks<H2>(self, hooks: H2) -> EntityRepository<'conn, T, H2>
    where
        H2: RepositoryHooks<T::Entity>,
    {
        EntityRepository {
            conn: self.conn,
            query_builder: self.query_builder,
            hooks,
            interceptors: self.interceptors,
            processors: self.processors,
            unit_of_work: self.unit_of_work,
            read_only: self.read_only,
        }
    }

    pub fn with_query_builder(mut self, query_builder: QueryBuilder<T>) -> Self {
        self.query_builder = query_builder;
        self
    }

    /// Registers an entity-specific filter on the current query builder.
    pub fn with_filter(mut self, filter: impl FilteredQueryBuilder<T> + 'static) -> Self {
        self.query_builder.add_filter(filter);
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn SaveInterceptor<T::Entity>>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Registers a processor run over the rows of every read.
    pub fn with_processor(mut self, processor: Arc<dyn EntityProcessor<T::Entity>>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Turns off the write path regardless of the connection mode.
    pub fn into_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    pub fn query_builder(&self) -> &QueryBuilder<T> {
        &self.query_builder
    }

    pub fn unit_of_work(&self) -> &UnitOfWork<T::Entity> {
        &self.unit_of_work
    }

    /// Staged or committed entity of one entry.
    ///
    /// Keys assigned by the store are visible once committed, until the next
    /// change is staged or the next `save_changes` starts.
    pub fn entry(&self, id: EntryId) -> Option<&T::Entity> {
        self.unit_of_work.entity(id)
    }

    pub fn entry_state(&self, id: EntryId) -> Option<EntryState> {
        self.unit_of_work.state(id)
    }

    /// Staged add and modify entities in staging order.
    ///
    /// Lets callers run a normalizer pipeline over the tracked entities
    /// explicitly before `save_changes`.
    pub fn staged_mut(&mut self) -> impl Iterator<Item = &mut T::Entity> + '_ {
        self.unit_of_work
            .pending_mut()
            .filter(|(_, operation, _)| *operation != Operation::Remove)
            .map(|(_, _, entity)| entity)
    }

    /// Runs every registered interceptor on the staged add and modify
    /// entities, exactly as `save_changes` does before committing.
    ///
    /// Returns the number of entities intercepted.
    pub fn apply_interceptors(&mut self) -> RepoResult<usize> {
        let mut entities = 0;
        for (_, operation, entity) in self.unit_of_work.pending_mut() {
            if operation == Operation::Remove {
                continue;
            }
            for interceptor in &self.interceptors {
                interceptor.saving(self.conn, entity)?;
            }
            entities += 1;
        }
        Ok(entities)
    }

    /// Drops every staged change.
    pub fn discard(&mut self) {
        self.unit_of_work.discard_pending();
    }

    /// Drops staged and committed entries.
    pub fn clear(&mut self) {
        self.unit_of_work.clear();
    }

    /// Materializes a built query, attaching requested includes and running
    /// the registered processors.
    pub fn fetch(&self, query: EntityQuery<T>) -> RepoResult<Vec<T::Entity>> {
        let started_at = Instant::now();
        let mut stmt = self.conn.prepare(&query.select.sql)?;
        let mut rows = stmt.query(params_from_iter(query.select.params.iter()))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(T::Entity::from_row(row)?);
        }

        if !query.includes.is_empty() && !items.is_empty() {
            T::attach_includes(self.conn, &mut items, query.includes)?;
        }
        if !items.is_empty() {
            for processor in &self.processors {
                processor.process_many(self.conn, &mut items)?;
            }
        }

        debug!(
            "event=entity_list module=repo status=ok entity={} rows={} duration_ms={}",
            T::Entity::TABLE,
            items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(items)
    }

    fn ensure_writable(&self, operation: &'static str) -> RepoResult<()> {
        if self.read_only {
            return Err(RepoError::NotSupported {
                entity: T::Entity::TABLE,
                operation,
                reason: "the backing store is read-only",
            });
        }
        Ok(())
    }
}

impl<T, H> EntityReadService<T> for EntityRepository<'_, T, H>
where
    T: EntityTraits,
    H: RepositoryHooks<T::Entity>,
{
    fn details(&self, id: KeyOf<T>) -> RepoResult<Option<T::Entity>> {
        if id.is_zero() {
            return Ok(None);
        }

        let so = T::SearchObject::with_id(id);
        let items = self.list(Some(&so), Some(&PagingInfo::first(1)))?;
        Ok(items.into_iter().next())
    }

    fn list(
        &self,
        so: Option<&T::SearchObject>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>> {
        let search_objects = so.map(std::slice::from_ref).unwrap_or(&[]);
        self.fetch(self.query_builder.query(search_objects, &[], None, paging))
    }

    fn list_many(
        &self,
        so: &[T::SearchObject],
        sort_by: &[T::SortBy],
        includes: Option<T::Includes>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>> {
        self.fetch(self.query_builder.query(so, sort_by, includes, paging))
    }

    fn count(&self, so: Option<&T::SearchObject>) -> RepoResult<u64> {
        self.count_many(so.map(std::slice::from_ref).unwrap_or(&[]))
    }

    fn count_many(&self, so: &[T::SearchObject]) -> RepoResult<u64> {
        let query = self.query_builder.count_query(so);
        let count: i64 =
            self.conn
                .query_row(&query.sql, params_from_iter(query.params.iter()), |row| {
                    row.get(0)
                })?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

impl<T, H> EntityRepositoryApi<T> for EntityRepository<'_, T, H>
where
    T: EntityTraits,
    H: RepositoryHooks<T::Entity>,
{
    fn add(&mut self, mut item: T::Entity) -> RepoResult<EntryId> {
        self.ensure_writable("add")?;
        self.hooks.prepare_item(&mut item);
        if item.is_new() {
            if let Some(key) = <KeyOf<T> as EntityKey>::generate() {
                item.set_id(key);
            }
        }
        Ok(self.unit_of_work.stage(item, Operation::Add))
    }

    fn modify(&mut self, mut item: T::Entity) -> RepoResult<Option<EntryId>> {
        self.ensure_writable("modify")?;
        self.hooks.prepare_item(&mut item);

        let Some(mut original) = self.details(item.id())? else {
            debug!(
                "event=entity_modify module=repo status=skipped entity={} reason=original_missing",
                T::Entity::TABLE
            );
            return Ok(None);
        };

        original.copy_values_from(&item);
        self.hooks.modify_original(&item, &mut original);
        Ok(Some(self.unit_of_work.stage(original, Operation::Modify)))
    }

    fn remove(&mut self, item: T::Entity) -> RepoResult<EntryId> {
        self.ensure_writable("remove")?;
        Ok(self.unit_of_work.stage(item, Operation::Remove))
    }

    fn save_changes(&mut self, token: &CancellationToken) -> RepoResult<usize> {
        self.ensure_writable("save_changes")?;
        if token.is_cancelled() {
            return Err(RepoError::Cancelled);
        }
        self.unit_of_work.release_committed();
        if !self.unit_of_work.has_pending() {
            return Ok(0);
        }

        let started_at = Instant::now();
        self.apply_interceptors()?;

        // Dropping `tx` on any early return rolls every statement back.
        let tx = self.conn.unchecked_transaction()?;
        let mut affected = 0;
        let mut assigned_keys = Vec::new();
        for (entry_id, operation, entity) in self.unit_of_work.pending() {
            match operation {
                Operation::Add => {
                    let (rows, key) = insert_entity(&tx, entity)?;
                    affected += rows;
                    if let Some(key) = key {
                        assigned_keys.push((entry_id, key));
                    }
                }
                Operation::Modify => affected += update_entity(&tx, entity)?,
                Operation::Remove => affected += delete_entity(&tx, entity)?,
            }
        }

        if token.is_cancelled() {
            return Err(RepoError::Cancelled);
        }
        tx.commit()?;

        for (entry_id, key) in assigned_keys {
            if let Some(entity) = self.unit_of_work.entity_mut(entry_id) {
                entity.set_id(key);
            }
        }
        let entries = self.unit_of_work.pending_count();
        self.unit_of_work.mark_committed();

        info!(
            "event=save_changes module=repo status=ok entity={} entries={} affected={} duration_ms={}",
            T::Entity::TABLE,
            entries,
            affected,
            started_at.elapsed().as_millis()
        );
        Ok(affected)
    }
}

fn checked_values<E: Entity>(entity: &E) -> RepoResult<Vec<Value>> {
    let values = entity.to_values();
    if values.len() != E::COLUMNS.len() {
        return Err(RepoError::InvalidData(format!(
            "`{}` maps {} columns but produced {} values",
            E::TABLE,
            E::COLUMNS.len(),
            values.len()
        )));
    }
    Ok(values)
}

/// Inserts one entity; returns affected rows and the store-assigned key.
fn insert_entity<E: Entity>(
    conn: &Connection,
    entity: &E,
) -> RepoResult<(usize, Option<E::Key>)> {
    let mut values = checked_values(entity)?;
    let id = entity.id();

    if !id.is_zero() {
        values.insert(0, id.to_sql_value());
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            E::TABLE,
            select_columns::<E>(),
            placeholders(values.len())
        );
        let rows = conn.execute(&sql, params_from_iter(values.iter()))?;
        return Ok((rows, None));
    }

    let sql = if values.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES;", E::TABLE)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders(values.len())
        )
    };
    let rows = conn.execute(&sql, params_from_iter(values.iter()))?;
    let key = E::Key::from_row_id(conn.last_insert_rowid()).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "`{}` was added with a zero key the store cannot assign",
            E::TABLE
        ))
    })?;
    Ok((rows, Some(key)))
}

fn update_entity<E: Entity>(conn: &Connection, entity: &E) -> RepoResult<usize> {
    let mut values = checked_values(entity)?;
    if values.is_empty() {
        return Ok(0);
    }

    let assignments = E::COLUMNS
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {assignments} WHERE {} = ?;",
        E::TABLE,
        E::KEY_COLUMN
    );
    values.push(entity.id().to_sql_value());
    Ok(conn.execute(&sql, params_from_iter(values.iter()))?)
}

fn delete_entity<E: Entity>(conn: &Connection, entity: &E) -> RepoResult<usize> {
    let sql = format!("DELETE FROM {} WHERE {} = ?1;", E::TABLE, E::KEY_COLUMN);
    Ok(conn.execute(&sql, [entity.id().to_sql_value()])?)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn ensure_entity_table<E: Entity>(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, E::TABLE)? {
        return Err(RepoError::MissingRequiredTable(E::TABLE));
    }

    let columns = table_columns(conn, E::TABLE)?;
    for column in std::iter::once(E::KEY_COLUMN).chain(E::COLUMNS.iter().copied()) {
        if !columns.iter().any(|current| current == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: E::TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
