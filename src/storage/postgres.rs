//! # PostgreSQL Storage Adapter
//!
//! SQLx-backed implementation of the storage ports. Rows are read into
//! private row structs with text-encoded enums and converted at the edge, so
//! the domain models stay persistence-agnostic. The relational schema lives
//! in `migrations/0001_initial.sql`.
//!
//! Conditional writes implement the optimistic-concurrency contract with
//! `UPDATE ... WHERE lock_version = $n` inside a transaction; zero affected
//! rows means a concurrent writer won and the call fails with
//! `VersionConflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{
    ApprovalRecord, Category, CategoryUpdate, NewCategory, NewScheduledEvent, NewTask,
    NewTaskStep, NewWorkflowTemplate, ScheduledEvent, StepTemplate, Task, TaskStep,
    TemplateScope, WorkflowTemplate,
};
use crate::tenancy::TenantContext;

use super::{
    CategoryStore, EventStore, StorageError, StorageResult, TaskFilter, TaskStore, TemplateStore,
};

/// PostgreSQL adapter over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_field<T>(raw: &str, field: &str) -> StorageResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| StorageError::Backend(format!("corrupt {field} column: {e}")))
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    category_uuid: Uuid,
    value: String,
    label: String,
    sub_categories: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            category_uuid: row.category_uuid,
            value: row.value,
            label: row.label,
            sub_categories: row.sub_categories,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TemplateRow {
    template_uuid: Uuid,
    category_uuid: Uuid,
    sub_category_scope: String,
    sla_days: i32,
    sla_hours: i32,
    warning_threshold: i32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct StepTemplateRow {
    sequence: i32,
    title: String,
    description: Option<String>,
    required: bool,
    estimated_minutes: Option<i32>,
}

impl From<StepTemplateRow> for StepTemplate {
    fn from(row: StepTemplateRow) -> Self {
        StepTemplate {
            sequence: row.sequence,
            title: row.title,
            description: row.description,
            required: row.required,
            estimated_minutes: row.estimated_minutes,
        }
    }
}

impl TemplateRow {
    fn into_template(self, steps: Vec<StepTemplate>) -> WorkflowTemplate {
        WorkflowTemplate {
            template_uuid: self.template_uuid,
            category_uuid: self.category_uuid,
            scope: TemplateScope::parse(&self.sub_category_scope),
            sla_days: self.sla_days,
            sla_hours: self.sla_hours,
            warning_threshold: self.warning_threshold,
            steps,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    task_uuid: Uuid,
    tenant_uuid: Uuid,
    title: String,
    summary: Option<String>,
    category: String,
    sub_category: Option<String>,
    channel: String,
    priority: String,
    status: String,
    progress: i32,
    deleted: bool,
    lock_version: i64,
    sla_due_at: Option<DateTime<Utc>>,
    sla_warning_threshold: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StorageError;

    fn try_from(row: TaskRow) -> StorageResult<Self> {
        Ok(Task {
            task_uuid: row.task_uuid,
            tenant_uuid: row.tenant_uuid,
            title: row.title,
            summary: row.summary,
            category: row.category,
            sub_category: row.sub_category,
            channel: parse_field(&row.channel, "channel")?,
            priority: parse_field(&row.priority, "priority")?,
            status: parse_field(&row.status, "status")?,
            progress: row.progress,
            deleted: row.deleted,
            lock_version: row.lock_version,
            sla_due_at: row.sla_due_at,
            sla_warning_threshold: row.sla_warning_threshold,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TaskStepRow {
    task_step_uuid: Uuid,
    task_uuid: Uuid,
    sequence: i32,
    title: String,
    description: Option<String>,
    required: bool,
    status: String,
    completed_by: Option<Uuid>,
    completed_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskStepRow> for TaskStep {
    type Error = StorageError;

    fn try_from(row: TaskStepRow) -> StorageResult<Self> {
        Ok(TaskStep {
            task_step_uuid: row.task_step_uuid,
            task_uuid: row.task_uuid,
            sequence: row.sequence,
            title: row.title,
            description: row.description,
            required: row.required,
            status: parse_field(&row.status, "status")?,
            completed_by: row.completed_by,
            completed_at: row.completed_at,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    event_uuid: Uuid,
    tenant_uuid: Uuid,
    title: String,
    event_type: String,
    scheduled_at: DateTime<Utc>,
    priority: String,
    status: String,
    current_stage: i32,
    lock_version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ApprovalRow {
    stage: i32,
    role: String,
    status: String,
    required: bool,
    decided_by: Option<Uuid>,
    decided_at: Option<DateTime<Utc>>,
}

impl TryFrom<ApprovalRow> for ApprovalRecord {
    type Error = StorageError;

    fn try_from(row: ApprovalRow) -> StorageResult<Self> {
        Ok(ApprovalRecord {
            stage: row.stage,
            role: parse_field(&row.role, "role")?,
            status: parse_field(&row.status, "status")?,
            required: row.required,
            decided_by: row.decided_by,
            decided_at: row.decided_at,
        })
    }
}

impl EventRow {
    fn into_event(self, approvals: Vec<ApprovalRecord>) -> StorageResult<ScheduledEvent> {
        Ok(ScheduledEvent {
            event_uuid: self.event_uuid,
            tenant_uuid: self.tenant_uuid,
            title: self.title,
            event_type: self.event_type,
            scheduled_at: self.scheduled_at,
            priority: parse_field(&self.priority, "priority")?,
            status: parse_field(&self.status, "status")?,
            current_stage: self.current_stage,
            approvals,
            lock_version: self.lock_version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const TASK_COLUMNS: &str = "task_uuid, tenant_uuid, title, summary, category, sub_category, \
     channel, priority, status, progress, deleted, lock_version, sla_due_at, \
     sla_warning_threshold, created_at, updated_at, completed_at";

const STEP_COLUMNS: &str = "task_step_uuid, task_uuid, sequence, title, description, required, \
     status, completed_by, completed_at, notes, created_at, updated_at";

#[async_trait]
impl CategoryStore for PgStorage {
    async fn insert(&self, category: NewCategory) -> StorageResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO grievance_categories (category_uuid, value, label, sub_categories, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING category_uuid, value, label, sub_categories, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&category.value)
        .bind(&category.label)
        .bind(&category.sub_categories)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        category_uuid: Uuid,
        update: CategoryUpdate,
    ) -> StorageResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE grievance_categories
            SET label = COALESCE($2, label),
                sub_categories = COALESCE($3, sub_categories),
                updated_at = NOW()
            WHERE category_uuid = $1
            RETURNING category_uuid, value, label, sub_categories, created_at, updated_at
            "#,
        )
        .bind(category_uuid)
        .bind(update.label)
        .bind(update.sub_categories)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, category_uuid: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM grievance_categories WHERE category_uuid = $1")
            .bind(category_uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_slug(&self, slug: &str) -> StorageResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_uuid, value, label, sub_categories, created_at, updated_at \
             FROM grievance_categories WHERE value = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_uuid(&self, category_uuid: Uuid) -> StorageResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_uuid, value, label, sub_categories, created_at, updated_at \
             FROM grievance_categories WHERE category_uuid = $1",
        )
        .bind(category_uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> StorageResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_uuid, value, label, sub_categories, created_at, updated_at \
             FROM grievance_categories ORDER BY value",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl PgStorage {
    async fn steps_for_template(
        &self,
        template_uuid: Uuid,
    ) -> StorageResult<Vec<StepTemplate>> {
        let rows = sqlx::query_as::<_, StepTemplateRow>(
            "SELECT sequence, title, description, required, estimated_minutes \
             FROM grievance_step_templates WHERE template_uuid = $1 ORDER BY sequence",
        )
        .bind(template_uuid)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TemplateStore for PgStorage {
    async fn insert(&self, template: NewWorkflowTemplate) -> StorageResult<WorkflowTemplate> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TemplateRow>(
            r#"
            INSERT INTO grievance_workflow_templates
                (template_uuid, category_uuid, sub_category_scope, sla_days, sla_hours, warning_threshold, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING template_uuid, category_uuid, sub_category_scope, sla_days, sla_hours, warning_threshold, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(template.category_uuid)
        .bind(template.scope.as_str())
        .bind(template.sla_days)
        .bind(template.sla_hours)
        .bind(template.warning_threshold)
        .fetch_one(&mut *tx)
        .await?;

        for step in &template.steps {
            sqlx::query(
                r#"
                INSERT INTO grievance_step_templates
                    (template_uuid, sequence, title, description, required, estimated_minutes)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(row.template_uuid)
            .bind(step.sequence)
            .bind(&step.title)
            .bind(&step.description)
            .bind(step.required)
            .bind(step.estimated_minutes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row.into_template(template.steps))
    }

    async fn find_by_scope(
        &self,
        category_uuid: Uuid,
        scope: &TemplateScope,
    ) -> StorageResult<Option<WorkflowTemplate>> {
        let row = sqlx::query_as::<_, TemplateRow>(
            "SELECT template_uuid, category_uuid, sub_category_scope, sla_days, sla_hours, \
                    warning_threshold, created_at \
             FROM grievance_workflow_templates \
             WHERE category_uuid = $1 AND sub_category_scope = $2",
        )
        .bind(category_uuid)
        .bind(scope.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let steps = self.steps_for_template(row.template_uuid).await?;
                Ok(Some(row.into_template(steps)))
            }
            None => Ok(None),
        }
    }

    async fn list_for_category(
        &self,
        category_uuid: Uuid,
    ) -> StorageResult<Vec<WorkflowTemplate>> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            "SELECT template_uuid, category_uuid, sub_category_scope, sla_days, sla_hours, \
                    warning_threshold, created_at \
             FROM grievance_workflow_templates WHERE category_uuid = $1 \
             ORDER BY sub_category_scope",
        )
        .bind(category_uuid)
        .fetch_all(&self.pool)
        .await?;

        let mut templates = Vec::with_capacity(rows.len());
        for row in rows {
            let steps = self.steps_for_template(row.template_uuid).await?;
            templates.push(row.into_template(steps));
        }
        Ok(templates)
    }
}

#[async_trait]
impl TaskStore for PgStorage {
    async fn insert_with_steps(
        &self,
        task: NewTask,
        steps: Vec<NewTaskStep>,
    ) -> StorageResult<(Task, Vec<TaskStep>)> {
        let mut tx = self.pool.begin().await?;

        let task_row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO grievance_tasks
                (task_uuid, tenant_uuid, title, summary, category, sub_category, channel,
                 priority, status, progress, deleted, lock_version, sla_due_at,
                 sla_warning_threshold, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'open', 0, FALSE, 1, $9, $10, NOW(), NOW())
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(task.tenant_uuid)
        .bind(&task.title)
        .bind(&task.summary)
        .bind(&task.category)
        .bind(&task.sub_category)
        .bind(task.channel.to_string())
        .bind(task.priority.to_string())
        .bind(task.sla_due_at)
        .bind(task.sla_warning_threshold)
        .fetch_one(&mut *tx)
        .await?;

        let mut step_rows = Vec::with_capacity(steps.len());
        for step in steps {
            let step_row = sqlx::query_as::<_, TaskStepRow>(&format!(
                r#"
                INSERT INTO grievance_task_steps
                    (task_step_uuid, task_uuid, sequence, title, description, required,
                     status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, 'pending', NOW(), NOW())
                RETURNING {STEP_COLUMNS}
                "#
            ))
            .bind(Uuid::new_v4())
            .bind(task_row.task_uuid)
            .bind(step.sequence)
            .bind(&step.title)
            .bind(&step.description)
            .bind(step.required)
            .fetch_one(&mut *tx)
            .await?;
            step_rows.push(TaskStep::try_from(step_row)?);
        }

        tx.commit().await?;
        Ok((Task::try_from(task_row)?, step_rows))
    }

    async fn find(&self, ctx: &TenantContext, task_uuid: Uuid) -> StorageResult<Option<Task>> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {TASK_COLUMNS} FROM grievance_tasks WHERE deleted = FALSE AND task_uuid = "
        ));
        query.push_bind(task_uuid);
        if !ctx.cross_tenant() {
            query.push(" AND tenant_uuid = ");
            query.push_bind(ctx.tenant_uuid);
        }

        let row = query
            .build_query_as::<TaskRow>()
            .fetch_optional(&self.pool)
            .await?;
        row.map(Task::try_from).transpose()
    }

    async fn list(&self, ctx: &TenantContext, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {TASK_COLUMNS} FROM grievance_tasks WHERE deleted = FALSE"
        ));
        if !ctx.cross_tenant() {
            query.push(" AND tenant_uuid = ");
            query.push_bind(ctx.tenant_uuid);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(status.to_string());
        }
        if let Some(ref category) = filter.category {
            query.push(" AND category = ");
            query.push_bind(category.clone());
        }
        if let Some(priority) = filter.priority {
            query.push(" AND priority = ");
            query.push_bind(priority.to_string());
        }
        query.push(" ORDER BY created_at DESC");

        let rows = query
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn steps_for_task(&self, task_uuid: Uuid) -> StorageResult<Vec<TaskStep>> {
        let rows = sqlx::query_as::<_, TaskStepRow>(&format!(
            "SELECT {STEP_COLUMNS} FROM grievance_task_steps WHERE task_uuid = $1 ORDER BY sequence"
        ))
        .bind(task_uuid)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TaskStep::try_from).collect()
    }

    async fn category_in_use(&self, category_slug: &str) -> StorageResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM grievance_tasks WHERE category = $1")
                .bind(category_slug)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn commit_step_completion(
        &self,
        task: &Task,
        expected_version: i64,
        step: &TaskStep,
    ) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE grievance_tasks
            SET status = $1, progress = $2, completed_at = $3, updated_at = NOW(),
                lock_version = lock_version + 1
            WHERE task_uuid = $4 AND lock_version = $5
            "#,
        )
        .bind(task.status.to_string())
        .bind(task.progress)
        .bind(task.completed_at)
        .bind(task.task_uuid)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StorageError::VersionConflict);
        }

        sqlx::query(
            r#"
            UPDATE grievance_task_steps
            SET status = $1, completed_by = $2, completed_at = $3, notes = $4, updated_at = NOW()
            WHERE task_step_uuid = $5
            "#,
        )
        .bind(step.status.to_string())
        .bind(step.completed_by)
        .bind(step.completed_at)
        .bind(&step.notes)
        .bind(step.task_step_uuid)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_task(&self, task: &Task, expected_version: i64) -> StorageResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE grievance_tasks
            SET status = $1, progress = $2, deleted = $3, completed_at = $4, updated_at = NOW(),
                lock_version = lock_version + 1
            WHERE task_uuid = $5 AND lock_version = $6
            "#,
        )
        .bind(task.status.to_string())
        .bind(task.progress)
        .bind(task.deleted)
        .bind(task.completed_at)
        .bind(task.task_uuid)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StorageError::VersionConflict);
        }
        Ok(())
    }
}

impl PgStorage {
    async fn approvals_for_event(&self, event_uuid: Uuid) -> StorageResult<Vec<ApprovalRecord>> {
        let rows = sqlx::query_as::<_, ApprovalRow>(
            "SELECT stage, role, status, required, decided_by, decided_at \
             FROM grievance_event_approvals WHERE event_uuid = $1 ORDER BY stage",
        )
        .bind(event_uuid)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ApprovalRecord::try_from).collect()
    }
}

#[async_trait]
impl EventStore for PgStorage {
    async fn insert(
        &self,
        event: NewScheduledEvent,
        approvals: Vec<ApprovalRecord>,
    ) -> StorageResult<ScheduledEvent> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO grievance_events
                (event_uuid, tenant_uuid, title, event_type, scheduled_at, priority,
                 status, current_stage, lock_version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', 0, 1, NOW(), NOW())
            RETURNING event_uuid, tenant_uuid, title, event_type, scheduled_at, priority,
                      status, current_stage, lock_version, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.tenant_uuid)
        .bind(&event.title)
        .bind(&event.event_type)
        .bind(event.scheduled_at)
        .bind(event.priority.to_string())
        .fetch_one(&mut *tx)
        .await?;

        for record in &approvals {
            sqlx::query(
                r#"
                INSERT INTO grievance_event_approvals
                    (event_uuid, stage, role, status, required, decided_by, decided_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(row.event_uuid)
            .bind(record.stage)
            .bind(record.role.to_string())
            .bind(record.status.to_string())
            .bind(record.required)
            .bind(record.decided_by)
            .bind(record.decided_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        row.into_event(approvals)
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        event_uuid: Uuid,
    ) -> StorageResult<Option<ScheduledEvent>> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT event_uuid, tenant_uuid, title, event_type, scheduled_at, priority, \
                    status, current_stage, lock_version, created_at, updated_at \
             FROM grievance_events WHERE event_uuid = ",
        );
        query.push_bind(event_uuid);
        if !ctx.cross_tenant() {
            query.push(" AND tenant_uuid = ");
            query.push_bind(ctx.tenant_uuid);
        }

        let Some(row) = query
            .build_query_as::<EventRow>()
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let approvals = self.approvals_for_event(row.event_uuid).await?;
        row.into_event(approvals).map(Some)
    }

    async fn update(&self, event: &ScheduledEvent, expected_version: i64) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE grievance_events
            SET status = $1, current_stage = $2, updated_at = NOW(),
                lock_version = lock_version + 1
            WHERE event_uuid = $3 AND lock_version = $4
            "#,
        )
        .bind(event.status.to_string())
        .bind(event.current_stage)
        .bind(event.event_uuid)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StorageError::VersionConflict);
        }

        for record in &event.approvals {
            sqlx::query(
                r#"
                UPDATE grievance_event_approvals
                SET status = $1, decided_by = $2, decided_at = $3
                WHERE event_uuid = $4 AND stage = $5
                "#,
            )
            .bind(record.status.to_string())
            .bind(record.decided_by)
            .bind(record.decided_at)
            .bind(event.event_uuid)
            .bind(record.stage)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
