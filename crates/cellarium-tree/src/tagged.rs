//! Tagged fan-out: everything carrying a direct annotation link to one tag.

use tracing::debug;

use cellarium_core::{ImageRecord, QueryParams, Result, Scope, ServiceOptions, TaggedRecords};

use crate::acquisitions::record_acquisition;
use crate::datasets::record_dataset;
use crate::images::record_image;
use crate::plates::record_plate;
use crate::projects::record_project;
use crate::screens::record_screen;
use crate::Browser;

impl Browser {
    /// Marshal every entity kind tagged with the given tag id, optionally
    /// restricted to one owner: a fixed fan-out of six sub-queries sharing
    /// one annotation-link filter clause and its `lower(name), id` ordering.
    ///
    /// `lower(obj.name)` is projected as a trailing column so the service
    /// can sort on it under `distinct`; the decoders read the leading
    /// columns only.
    pub async fn marshal_tagged(&self, tag_id: i64, scope: &Scope) -> Result<TaggedRecords> {
        let mut params = QueryParams::new();
        let opts = ServiceOptions::scoped(scope.group());

        params.paginate(scope.page.number, self.limit_for(&scope.page));
        params.add_long("tid", tag_id);

        let mut common_clause = String::from(
            "
            join obj.annotationLinks alink
            where alink.child.id = :tid
            ",
        );
        if let Some(eid) = scope.experimenter() {
            params.add_id(eid);
            common_clause.push_str(" and obj.details.owner.id = :id ");
        }
        common_clause.push_str(" order by lower(obj.name), obj.id ");

        let mut tagged = TaggedRecords::default();

        let q = format!(
            r#"
            select distinct obj.id,
                   obj.name,
                   obj.details.owner.id,
                   obj.details.permissions,
                   (select count(pdl.id) from ProjectDatasetLink pdl
                    where pdl.parent = obj.id),
                   lower(obj.name)
            from Project obj
            {common_clause}
            "#
        );
        for row in self.svc.projection(&q, &params, &opts).await? {
            tagged.projects.push(record_project(&row, &self.ctx)?);
        }

        let q = format!(
            r#"
            select distinct obj.id,
                   obj.name,
                   obj.details.owner.id,
                   obj.details.permissions,
                   (select count(dil.id) from DatasetImageLink dil
                    where dil.parent = obj.id),
                   lower(obj.name)
            from Dataset obj
            {common_clause}
            "#
        );
        for row in self.svc.projection(&q, &params, &opts).await? {
            tagged.datasets.push(record_dataset(&row, &self.ctx)?);
        }

        let q = format!(
            r#"
            select distinct obj.id,
                   obj.name,
                   obj.details.owner.id,
                   obj.details.permissions,
                   obj.fileset.id,
                   lower(obj.name)
            from Image obj
            {common_clause}
            "#
        );
        for row in self.svc.projection(&q, &params, &opts).await? {
            tagged
                .images
                .push(ImageRecord::Live(record_image(&row, &self.ctx)?));
        }

        let q = format!(
            r#"
            select distinct obj.id,
                   obj.name,
                   obj.details.owner.id,
                   obj.details.permissions,
                   (select count(spl.id) from ScreenPlateLink spl
                    where spl.parent = obj.id),
                   lower(obj.name)
            from Screen obj
            {common_clause}
            "#
        );
        for row in self.svc.projection(&q, &params, &opts).await? {
            tagged.screens.push(record_screen(&row, &self.ctx)?);
        }

        let q = format!(
            r#"
            select distinct obj.id,
                   obj.name,
                   obj.details.owner.id,
                   obj.details.permissions,
                   (select count(pa.id) from PlateAcquisition pa
                    where pa.plate.id = obj.id),
                   lower(obj.name)
            from Plate obj
            {common_clause}
            "#
        );
        for row in self.svc.projection(&q, &params, &opts).await? {
            tagged.plates.push(record_plate(&row, &self.ctx)?);
        }

        let q = format!(
            r#"
            select distinct obj.id,
                   obj.name,
                   obj.details.owner.id,
                   obj.details.permissions,
                   obj.startTime,
                   obj.endTime,
                   lower(obj.name)
            from PlateAcquisition obj
            {common_clause}
            "#
        );
        for row in self.svc.projection(&q, &params, &opts).await? {
            tagged
                .acquisitions
                .push(record_acquisition(&row, &self.ctx)?);
        }

        debug!(
            projects = tagged.projects.len(),
            datasets = tagged.datasets.len(),
            images = tagged.images.len(),
            screens = tagged.screens.len(),
            plates = tagged.plates.len(),
            acquisitions = tagged.acquisitions.len(),
            "marshal_tagged"
        );
        Ok(tagged)
    }
}
